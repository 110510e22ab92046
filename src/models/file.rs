use std::fmt;

use serde::Serialize;

use crate::error::{ArchiveError, Result};

/// Lifecycle state of a catalog row.
///
/// A row whose fingerprint matches on rescan keeps whatever state it had;
/// there is no explicit "stable" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileState {
    NewScanned,
    UpdatedScanned,
    Archived,
    Error,
}

impl FileState {
    pub const ALL: [FileState; 4] = [
        FileState::NewScanned,
        FileState::UpdatedScanned,
        FileState::Archived,
        FileState::Error,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FileState::NewScanned => "new-scanned",
            FileState::UpdatedScanned => "updated-scanned",
            FileState::Archived => "archived",
            FileState::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ArchiveError::Validation {
                field: "state",
                detail: format!("unknown state {s:?}"),
            })
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog row, keyed by absolute path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    /// Absolute path of the file; primary key.
    pub path: String,
    /// SHA-256 of the contents, absent when last scanned in mtime mode.
    pub hash: Option<String>,
    /// Size in bytes at last observation.
    pub size: u64,
    /// Last-modified time as seconds since the Unix epoch.
    pub modified: f64,
    pub eligible: bool,
    pub eligibility_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_note: Option<String>,
    /// `None` means the file was never archived.
    pub archived: Option<bool>,
    pub state: Option<FileState>,
}

impl FileRecord {
    /// A freshly observed file, as inserted on first scan.
    #[must_use]
    pub fn new_scanned(
        path: String,
        hash: Option<String>,
        size: u64,
        modified: f64,
        eligible: bool,
        eligibility_note: String,
    ) -> Self {
        Self {
            path,
            hash,
            size,
            modified,
            eligible,
            eligibility_note,
            error_note: None,
            archived: None,
            state: Some(FileState::NewScanned),
        }
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.archived == Some(true)
    }
}
