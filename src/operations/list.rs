//! Catalog listing.

use serde::Serialize;

use crate::db::{Database, RecordFilter};
use crate::error::Result;
use crate::models::{FileRecord, FileState};

/// One listed row, trimmed to what is useful to a reader.
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    #[serde(rename = "p")]
    pub path: String,
    #[serde(rename = "s", skip_serializing_if = "Option::is_none")]
    pub state: Option<FileState>,
    #[serde(rename = "e")]
    pub eligible: bool,
    #[serde(rename = "sz")]
    pub size: u64,
    /// Eligibility note, when not empty.
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "err", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<FileRecord> for ListEntry {
    fn from(r: FileRecord) -> Self {
        Self {
            path: r.path,
            state: r.state,
            eligible: r.eligible,
            size: r.size,
            note: (!r.eligibility_note.is_empty()).then_some(r.eligibility_note),
            error: r.error_note,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub count: usize,
    pub files: Vec<ListEntry>,
}

/// List catalog rows ordered by path.
pub fn list_files(db: &Database, filter: &RecordFilter) -> Result<ListResult> {
    let files: Vec<ListEntry> = db
        .list_records(filter)?
        .into_iter()
        .map(ListEntry::from)
        .collect();
    Ok(ListResult {
        count: files.len(),
        files,
    })
}
