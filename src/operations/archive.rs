//! Archive output operations.

use serde::Serialize;

use crate::archiver::ArchiveResult;

/// A file that could not be written to the container.
#[derive(Debug, Clone, Serialize)]
pub struct FailedEntry {
    pub path: String,
    pub error: String,
}

/// Serializable archive summary.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveOutput {
    /// Absent when nothing was eligible and no container was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub archived: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedEntry>,
}

impl From<ArchiveResult> for ArchiveOutput {
    fn from(result: ArchiveResult) -> Self {
        Self {
            destination: result
                .destination
                .map(|p| p.to_string_lossy().into_owned()),
            archived: result.archived,
            failed: result
                .failed
                .into_iter()
                .map(|(path, error)| FailedEntry { path, error })
                .collect(),
        }
    }
}
