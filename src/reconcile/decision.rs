use crate::models::{FileRecord, Fingerprint};
use crate::reconcile::eligibility::{self, Eligibility};

/// Eligibility note written when an archived row is found still eligible.
pub const ARCHIVED_NOTE: &str = "filearchived";

/// What to do with the catalog row of one observed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No row yet: insert with state `new-scanned`.
    Create(Eligibility),
    /// Fingerprint changed: overwrite everything and set `updated-scanned`.
    FullUpdate(Eligibility),
    /// Fingerprint matched on an archived row still flagged eligible: force
    /// ineligible without touching hash, size, modified time or state.
    PartialUpdate,
    /// Fingerprint matched; leave the row alone.
    NoOp,
}

/// Decide the transition for `path` given its prior row, if any.
///
/// Archived rows that are still eligible are corrected without re-running
/// the eligibility rules.
#[must_use]
pub fn decide(
    prior: Option<&FileRecord>,
    path: &str,
    fingerprint: &Fingerprint,
    size: u64,
) -> Decision {
    let Some(prior) = prior else {
        return Decision::Create(eligibility::evaluate(path, size));
    };

    if !fingerprint.matches(prior) {
        return Decision::FullUpdate(eligibility::evaluate(path, size));
    }

    if prior.is_archived() && prior.eligible {
        Decision::PartialUpdate
    } else {
        Decision::NoOp
    }
}
