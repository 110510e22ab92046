use std::collections::BTreeSet;
use std::path::Path;

use crate::db::{Database, RowUpdate};
use crate::error::Result;
use crate::ingest::{ScanEntry, ScannedFile, Scanner};
use crate::models::FileRecord;
use crate::reconcile::{decide, Decision};

/// Error note for catalogued files that vanished from disk.
pub const MISSING_NOTE: &str = "File no longer exists at path";

/// Statistics from a scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Absolute root that was scanned.
    pub root: String,
    /// Files visited by the walk.
    pub files_seen: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Archived rows corrected to ineligible.
    pub archived_ineligible: usize,
    /// Files that could not be fingerprinted.
    pub errored: usize,
    /// Catalogued files under the root that no longer exist.
    pub missing: usize,
    pub skipped_non_utf8: usize,
    pub unreadable_dirs: usize,
}

/// What happened to a single observed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
    ArchivedIneligible,
    Errored,
}

/// Scan a root and reconcile every observed file against the catalog,
/// then flag catalogued files under the root that were not observed.
///
/// Writes happen one file at a time on the calling thread, in path order.
pub fn run_scan(db: &Database, scanner: &Scanner) -> Result<ScanResult> {
    let root = scanner.root().to_string_lossy().into_owned();
    tracing::info!(root = %root, mode = %scanner.mode(), "scanning");

    let outcome = scanner.scan();
    let mut result = ScanResult {
        root,
        files_seen: outcome.observed.len(),
        skipped_non_utf8: outcome.non_utf8.len(),
        unreadable_dirs: outcome.unreadable.len(),
        ..Default::default()
    };

    for entry in &outcome.entries {
        match reconcile_entry(db, entry)? {
            Outcome::Created => result.created += 1,
            Outcome::Updated => result.updated += 1,
            Outcome::Unchanged => result.unchanged += 1,
            Outcome::ArchivedIneligible => result.archived_ineligible += 1,
            Outcome::Errored => result.errored += 1,
        }
    }

    // Only after every per-file write has committed.
    result.missing = mark_missing(db, scanner.root(), &outcome.observed)?;

    tracing::info!(
        created = result.created,
        updated = result.updated,
        unchanged = result.unchanged,
        missing = result.missing,
        errored = result.errored,
        "scan complete"
    );
    Ok(result)
}

/// Apply one scan entry to the catalog.
pub fn reconcile_entry(db: &Database, entry: &ScanEntry) -> Result<Outcome> {
    match entry {
        ScanEntry::Scanned(file) => reconcile_file(db, file),
        ScanEntry::Failed { path, error } => {
            if db.mark_error(path, error)? {
                tracing::warn!(path = %path, error = %error, "read failed; marked as error");
            } else {
                tracing::warn!(path = %path, error = %error, "read failed; not catalogued");
            }
            Ok(Outcome::Errored)
        }
    }
}

/// Decide and apply the transition for one fingerprinted file.
pub fn reconcile_file(db: &Database, file: &ScannedFile) -> Result<Outcome> {
    let prior = db.lookup(&file.path)?;
    let decision = decide(prior.as_ref(), &file.path, &file.fingerprint, file.size);

    match decision {
        Decision::Create(eligibility) => {
            let record = FileRecord::new_scanned(
                file.path.clone(),
                file.fingerprint.hash().map(String::from),
                file.size,
                file.modified,
                eligibility.is_eligible(),
                eligibility.note(),
            );
            db.insert_if_absent(&record)?;
            tracing::info!(path = %file.path, eligible = record.eligible, "new-scanned");
            Ok(Outcome::Created)
        }
        Decision::FullUpdate(eligibility) => {
            db.update(
                &file.path,
                RowUpdate::Content {
                    hash: file.fingerprint.hash(),
                    size: file.size,
                    modified: file.modified,
                    eligibility: &eligibility,
                },
            )?;
            tracing::info!(
                path = %file.path,
                eligible = eligibility.is_eligible(),
                "updated-scanned"
            );
            Ok(Outcome::Updated)
        }
        Decision::PartialUpdate => {
            db.update(&file.path, RowUpdate::ArchivedIneligible)?;
            tracing::info!(path = %file.path, "already archived; marked ineligible");
            Ok(Outcome::ArchivedIneligible)
        }
        Decision::NoOp => {
            tracing::info!(path = %file.path, "unchanged");
            Ok(Outcome::Unchanged)
        }
    }
}

/// Mark catalogued paths under `root` that the walk did not observe.
/// Rows are kept; they move to the error state.
pub fn mark_missing(db: &Database, root: &Path, observed: &BTreeSet<String>) -> Result<usize> {
    let mut missing = 0;
    for path in db.list_all_paths()? {
        if !Path::new(&path).starts_with(root) || observed.contains(&path) {
            continue;
        }
        tracing::warn!(path = %path, "in catalog but no longer on disk");
        if db.mark_error(&path, MISSING_NOTE)? {
            missing += 1;
        }
    }
    Ok(missing)
}
