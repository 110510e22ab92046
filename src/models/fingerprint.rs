use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::file::FileRecord;

/// Which dimension of a file is tracked for change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Streamed SHA-256 of the file contents.
    #[default]
    Hash,
    /// Last-modified timestamp; never reads file bytes.
    Mtime,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Hash => f.write_str("hash"),
            ScanMode::Mtime => f.write_str("mtime"),
        }
    }
}

/// Change-detection value computed for a scanned file.
#[derive(Debug, Clone, PartialEq)]
pub enum Fingerprint {
    Hash(String),
    Mtime(f64),
}

impl Fingerprint {
    /// Compare against the dimension stored in a catalog row.
    #[must_use]
    pub fn matches(&self, record: &FileRecord) -> bool {
        match self {
            Fingerprint::Hash(h) => record.hash.as_deref() == Some(h.as_str()),
            #[allow(clippy::float_cmp)] // both sides come from the same f64 conversion
            Fingerprint::Mtime(m) => record.modified == *m,
        }
    }

    /// Hash to persist; mtime scans leave the column empty.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        match self {
            Fingerprint::Hash(h) => Some(h),
            Fingerprint::Mtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: Option<&str>, modified: f64) -> FileRecord {
        FileRecord::new_scanned("/x".into(), hash.map(String::from), 1, modified, true, String::new())
    }

    #[test]
    fn hash_fingerprint_ignores_mtime() {
        let fp = Fingerprint::Hash("abc".into());
        assert!(fp.matches(&record(Some("abc"), 1.0)));
        assert!(fp.matches(&record(Some("abc"), 2.0)));
        assert!(!fp.matches(&record(Some("def"), 1.0)));
    }

    #[test]
    fn hash_fingerprint_never_matches_missing_hash() {
        let fp = Fingerprint::Hash("abc".into());
        assert!(!fp.matches(&record(None, 1.0)));
    }

    #[test]
    fn mtime_fingerprint_ignores_hash() {
        let fp = Fingerprint::Mtime(42.25);
        assert!(fp.matches(&record(Some("anything"), 42.25)));
        assert!(!fp.matches(&record(Some("anything"), 42.5)));
        assert_eq!(fp.hash(), None);
    }
}
