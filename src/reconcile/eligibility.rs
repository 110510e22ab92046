//! Archival eligibility rules.
//!
//! Evaluation depends only on the file size and the byte length of its
//! path, never on prior catalog state. Rule violations are collected as
//! tags and rendered to text only when written to the catalog.

use std::fmt;

/// Largest file size (10 GiB) that may be archived.
pub const MAX_FILE_SIZE: u64 = 10_737_418_240;
/// Longest absolute path, in UTF-8 bytes, that may be archived.
pub const MAX_PATH_BYTES: usize = 4096;

/// A single eligibility rule that a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    TooLarge { size: u64 },
    PathTooLong { bytes: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooLarge { size } => write!(f, "[SIZE] File is too large ({size} bytes)"),
            Violation::PathTooLong { bytes } => {
                write!(f, "[PATH] File path is too long ({bytes} bytes)")
            }
        }
    }
}

/// Outcome of evaluating all rules against one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eligibility {
    violations: Vec<Violation>,
}

impl Eligibility {
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Render the violations in rule order; empty when eligible.
    #[must_use]
    pub fn note(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Check every rule; a file may fail several at once.
#[must_use]
pub fn evaluate(path: &str, size: u64) -> Eligibility {
    let mut violations = Vec::new();
    if size > MAX_FILE_SIZE {
        violations.push(Violation::TooLarge { size });
    }
    let bytes = path.len();
    if bytes > MAX_PATH_BYTES {
        violations.push(Violation::PathTooLong { bytes });
    }
    Eligibility { violations }
}
