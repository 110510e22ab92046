use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("scan root does not exist: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("cannot create archive {}: {source}", path.display())]
    ArchiveCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid {field}: {detail}")]
    Validation { field: &'static str, detail: String },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
