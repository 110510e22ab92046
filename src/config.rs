use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};
use crate::ingest::hasher::DEFAULT_BUFFER_SIZE;
use crate::ingest::scanner::normalize_path;
use crate::models::ScanMode;

/// Default catalog filename, created in the working directory.
const DB_FILE: &str = "archive-tool.sqlite3";
/// Settings filename, read from the working directory.
const CONFIG_FILE: &str = "archive-tool.toml";

/// Configuration resolved from the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that relative archive names resolve against.
    pub work_dir: PathBuf,
    /// Path to the `SQLite` catalog.
    pub db_path: PathBuf,
    /// Path to the settings file.
    pub config_path: PathBuf,
    /// User settings loaded from archive-tool.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from archive-tool.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub scan: ScanSettings,
    pub output: OutputSettings,
}

/// Scan-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Fingerprint mode used when `--mode` is not given.
    pub default_mode: ScanMode,
    /// Read chunk size in bytes for content hashing.
    pub buffer_size: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            default_mode: ScanMode::Hash,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// How `status` renders its counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Output-related settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

impl Config {
    /// Create config for a given working directory.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        let db_path = work_dir.join(DB_FILE);
        let config_path = work_dir.join(CONFIG_FILE);
        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            work_dir,
            db_path,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ArchiveError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    /// Point the catalog somewhere else, relative to the working directory.
    #[must_use]
    pub fn with_db_path(mut self, db_path: impl AsRef<Path>) -> Self {
        self.db_path = self.work_dir.join(db_path);
        self
    }

    /// Load settings from the settings file if it exists and parses.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), "ignoring invalid settings: {e}");
                None
            }
        }
    }

    /// Save current settings to the settings file.
    #[cfg(test)]
    pub fn save_settings(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| ArchiveError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Check whether the catalog database exists.
    #[must_use]
    pub fn catalog_exists(&self) -> bool {
        self.db_path.exists()
    }

    /// Resolve an archive filename against the working directory.
    #[must_use]
    pub fn archive_path(&self, filename: &str) -> PathBuf {
        self.work_dir.join(filename)
    }

    /// The catalog file and the SQLite sidecars written next to it.
    #[must_use]
    pub fn catalog_files(&self) -> Vec<PathBuf> {
        let db = std::path::absolute(&self.db_path)
            .map(|p| normalize_path(&p))
            .unwrap_or_else(|_| self.db_path.clone());
        let mut files = vec![db.clone()];
        for suffix in ["-wal", "-shm", "-journal"] {
            let mut name = db.clone().into_os_string();
            name.push(suffix);
            files.push(PathBuf::from(name));
        }
        files
    }
}
