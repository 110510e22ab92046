//! Scan output operations.
//!
//! Provides consistent serialization for scan results with all fields.

use serde::Serialize;

use crate::reconciler::ScanResult;

/// Serializable scan summary; zero counters are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutput {
    pub root: String,
    pub files_seen: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub created: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub updated: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub unchanged: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub archived_ineligible: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub errored: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub missing: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub skipped_non_utf8: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub unreadable_dirs: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde's skip_serializing_if
fn is_zero(v: &usize) -> bool {
    *v == 0
}

impl From<ScanResult> for ScanOutput {
    fn from(result: ScanResult) -> Self {
        Self {
            root: result.root,
            files_seen: result.files_seen,
            created: result.created,
            updated: result.updated,
            unchanged: result.unchanged,
            archived_ineligible: result.archived_ineligible,
            errored: result.errored,
            missing: result.missing,
            skipped_non_utf8: result.skipped_non_utf8,
            unreadable_dirs: result.unreadable_dirs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_output_from_result() {
        let result = ScanResult {
            root: "/data".into(),
            files_seen: 10,
            created: 4,
            updated: 2,
            unchanged: 3,
            errored: 1,
            missing: 5,
            ..Default::default()
        };
        let output: ScanOutput = result.into();
        assert_eq!(output.root, "/data");
        assert_eq!(output.files_seen, 10);
        assert_eq!(output.missing, 5);
    }

    #[test]
    fn serialization_skips_zeros() {
        let result = ScanResult {
            root: "/data".into(),
            files_seen: 0,
            created: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&ScanOutput::from(result)).unwrap();
        assert!(json.contains("\"files_seen\":0"));
        assert!(json.contains("\"created\":1"));
        assert!(!json.contains("missing"));
        assert!(!json.contains("unreadable_dirs"));
    }
}
