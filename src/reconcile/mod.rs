//! Reconciliation of scanned files against their catalog rows.

pub mod decision;
pub mod eligibility;

pub use decision::{decide, Decision, ARCHIVED_NOTE};
pub use eligibility::{evaluate, Eligibility, Violation};
