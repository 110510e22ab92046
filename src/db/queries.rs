use std::collections::{BTreeMap, BTreeSet};

use rusqlite::{params, OptionalExtension, Row};

use crate::error::{ArchiveError, Result};
use crate::models::{FileRecord, FileState};
use crate::reconcile::{Eligibility, ARCHIVED_NOTE};

use super::Database;

const RECORD_COLUMNS: &str =
    "path, hash, size, modified, eligibility, eligibilitynote, errornote, archived, state";

/// Field changes applied to an existing row by [`Database::update`].
#[derive(Debug, Clone, Copy)]
pub enum RowUpdate<'a> {
    /// Content changed: overwrite observation and eligibility, clear the
    /// error, reset archival and move to `updated-scanned`.
    Content {
        hash: Option<&'a str>,
        size: u64,
        modified: f64,
        eligibility: &'a Eligibility,
    },
    /// Archived row still flagged eligible: force it ineligible.
    ArchivedIneligible,
}

/// Row selection for [`Database::list_records`].
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub state: Option<FileState>,
    pub eligible_only: bool,
}

/// Raw column values before validation.
struct RawRecord {
    path: String,
    hash: Option<String>,
    size: i64,
    modified: f64,
    eligibility: i64,
    eligibility_note: String,
    error_note: Option<String>,
    archived: Option<bool>,
    state: Option<String>,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            path: row.get(0)?,
            hash: row.get(1)?,
            size: row.get(2)?,
            modified: row.get(3)?,
            eligibility: row.get(4)?,
            eligibility_note: row.get(5)?,
            error_note: row.get(6)?,
            archived: row.get(7)?,
            state: row.get(8)?,
        })
    }
}

impl TryFrom<RawRecord> for FileRecord {
    type Error = ArchiveError;

    fn try_from(raw: RawRecord) -> Result<Self> {
        let size = u64::try_from(raw.size).map_err(|_| ArchiveError::Validation {
            field: "size",
            detail: format!("negative size {} for {}", raw.size, raw.path),
        })?;
        let eligible = match raw.eligibility {
            0 => false,
            1 => true,
            other => {
                return Err(ArchiveError::Validation {
                    field: "eligibility",
                    detail: format!("{other} for {} must be 0 or 1", raw.path),
                })
            }
        };
        let state = raw.state.as_deref().map(FileState::parse).transpose()?;
        Ok(FileRecord {
            path: raw.path,
            hash: raw.hash,
            size,
            modified: raw.modified,
            eligible,
            eligibility_note: raw.eligibility_note,
            error_note: raw.error_note,
            archived: raw.archived,
            state,
        })
    }
}

fn size_param(size: u64) -> Result<i64> {
    i64::try_from(size).map_err(|_| ArchiveError::Validation {
        field: "size",
        detail: format!("{size} does not fit the catalog"),
    })
}

fn modified_param(modified: f64) -> Result<f64> {
    if modified.is_finite() {
        Ok(modified)
    } else {
        Err(ArchiveError::Validation {
            field: "modified",
            detail: format!("{modified} is not a finite timestamp"),
        })
    }
}

impl Database {
    // ─── Lookup ───

    /// Get the catalog row for an absolute path.
    pub fn lookup(&self, path: &str) -> Result<Option<FileRecord>> {
        let raw = self
            .conn()
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM files WHERE path = ?1"),
                params![path],
                RawRecord::from_row,
            )
            .optional()?;
        raw.map(FileRecord::try_from).transpose()
    }

    /// List rows ordered by path, optionally narrowed by state/eligibility.
    pub fn list_records(&self, filter: &RecordFilter) -> Result<Vec<FileRecord>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM files
             WHERE (?1 IS NULL OR state = ?1) AND (?2 = 0 OR eligibility = 1)
             ORDER BY path"
        ))?;
        let rows = stmt.query_map(
            params![filter.state.map(|s| s.as_str()), filter.eligible_only],
            RawRecord::from_row,
        )?;
        let mut records = Vec::new();
        for r in rows {
            records.push(FileRecord::try_from(r?)?);
        }
        Ok(records)
    }

    // ─── Mutation ───

    /// Insert a new row. Returns `false` if the path was already catalogued,
    /// in which case nothing is written.
    pub fn insert_if_absent(&self, record: &FileRecord) -> Result<bool> {
        let inserted = self.conn().execute(
            "INSERT OR IGNORE INTO files
                (path, hash, size, modified, eligibility, eligibilitynote, errornote, archived, state)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.path,
                record.hash,
                size_param(record.size)?,
                modified_param(record.modified)?,
                record.eligible,
                record.eligibility_note,
                record.error_note,
                record.archived,
                record.state.map(|s| s.as_str()),
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Apply an update to an existing row. Returns `false` if no row matched.
    pub fn update(&self, path: &str, update: RowUpdate<'_>) -> Result<bool> {
        let changed = match update {
            RowUpdate::Content {
                hash,
                size,
                modified,
                eligibility,
            } => self.conn().execute(
                "UPDATE files
                 SET hash = ?1, size = ?2, modified = ?3, eligibility = ?4, eligibilitynote = ?5,
                     errornote = NULL, archived = 0, state = ?6
                 WHERE path = ?7",
                params![
                    hash,
                    size_param(size)?,
                    modified_param(modified)?,
                    eligibility.is_eligible(),
                    eligibility.note(),
                    FileState::UpdatedScanned.as_str(),
                    path,
                ],
            )?,
            RowUpdate::ArchivedIneligible => self.conn().execute(
                "UPDATE files SET eligibility = 0, eligibilitynote = ?1 WHERE path = ?2",
                params![ARCHIVED_NOTE, path],
            )?,
        };
        Ok(changed > 0)
    }

    /// Mark every given path archived in a single transaction.
    pub fn mark_archived(&mut self, paths: &[String]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;
        let mut marked = 0;
        {
            let mut stmt =
                tx.prepare("UPDATE files SET archived = 1, state = ?1 WHERE path = ?2")?;
            for path in paths {
                marked += stmt.execute(params![FileState::Archived.as_str(), path])?;
            }
        }
        tx.commit()?;
        Ok(marked)
    }

    /// Put a row into the error state. Returns `false` if no row matched.
    pub fn mark_error(&self, path: &str, note: &str) -> Result<bool> {
        let changed = self.conn().execute(
            "UPDATE files SET eligibility = 0, errornote = ?1, state = ?2 WHERE path = ?3",
            params![note, FileState::Error.as_str(), path],
        )?;
        Ok(changed > 0)
    }

    // ─── Listing ───

    /// Paths currently eligible and not yet archived, ordered by path.
    pub fn list_eligible_unarchived(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(
            "SELECT path FROM files
             WHERE eligibility = 1 AND (archived = 0 OR archived IS NULL)
             ORDER BY path",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut paths = Vec::new();
        for r in rows {
            paths.push(r?);
        }
        Ok(paths)
    }

    /// Every catalogued path.
    pub fn list_all_paths(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn().prepare("SELECT path FROM files")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut paths = BTreeSet::new();
        for r in rows {
            paths.insert(r?);
        }
        Ok(paths)
    }

    // ─── Statistics ───

    /// Row count per state. Rows without a state are not counted.
    pub fn counts_by_state(&self) -> Result<BTreeMap<FileState, u64>> {
        let mut stmt = self.conn().prepare(
            "SELECT state, COUNT(*) FROM files WHERE state IS NOT NULL GROUP BY state",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut counts = BTreeMap::new();
        for r in rows {
            let (state, count) = r?;
            counts.insert(FileState::parse(&state)?, count as u64);
        }
        Ok(counts)
    }

    /// Total rows and ineligible rows.
    pub fn totals(&self) -> Result<(u64, u64)> {
        let (total, ineligible): (i64, i64) = self.conn().query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN eligibility = 0 THEN 1 ELSE 0 END), 0)
             FROM files",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        Ok((total as u64, ineligible as u64))
    }
}
