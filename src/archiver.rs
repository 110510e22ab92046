use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::db::Database;
use crate::error::{ArchiveError, Result};
use crate::ingest::scanner::normalize_path;

/// Outcome of an archive run.
#[derive(Debug, Clone, Default)]
pub struct ArchiveResult {
    /// Container path; `None` when nothing was eligible and no file was made.
    pub destination: Option<PathBuf>,
    /// Paths written to the container and marked archived.
    pub archived: Vec<String>,
    /// Paths that could not be written, with the error recorded for each.
    pub failed: Vec<(String, String)>,
}

/// Pack every eligible, unarchived file into a new zip at `destination`.
///
/// Per-file failures are recorded in the catalog and skipped. Only failing
/// to create the container itself is an error, and then nothing in the
/// catalog changes. A catalogued file at `destination` is left out, since
/// creating the container truncates it.
pub fn run_archive(db: &mut Database, destination: &Path) -> Result<ArchiveResult> {
    let target = std::path::absolute(destination)
        .map(|p| normalize_path(&p))
        .unwrap_or_else(|_| destination.to_path_buf());

    // Snapshot once; never re-queried during the run.
    let mut eligible = db.list_eligible_unarchived()?;
    eligible.retain(|path| {
        let is_target = Path::new(path) == target;
        if is_target {
            tracing::warn!(path = %path, "skipping the archive destination itself");
        }
        !is_target
    });
    if eligible.is_empty() {
        tracing::info!("no files eligible to be archived");
        return Ok(ArchiveResult::default());
    }

    tracing::info!(
        destination = %destination.display(),
        files = eligible.len(),
        "archiving"
    );
    let file = File::create(destination).map_err(|source| ArchiveError::ArchiveCreate {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut zip = ZipWriter::new(file);
    let (archived, failed) = write_entries(&mut zip, &eligible, db)?;
    zip.finish()?;

    db.mark_archived(&archived)?;
    tracing::info!(
        archived = archived.len(),
        failed = failed.len(),
        "archive complete"
    );

    Ok(ArchiveResult {
        destination: Some(destination.to_path_buf()),
        archived,
        failed,
    })
}

/// Add each path to the container, marking failures in the catalog as they
/// happen. Returns the successes and the failures in input order.
pub fn write_entries<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    paths: &[String],
    db: &Database,
) -> Result<(Vec<String>, Vec<(String, String)>)> {
    let mut archived = Vec::new();
    let mut failed = Vec::new();

    for path in paths {
        match add_entry(zip, path) {
            Ok(()) => {
                tracing::info!(path = %path, "archived");
                archived.push(path.clone());
            }
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(path = %path, error = %error, "could not archive");
                db.mark_error(path, &error)?;
                failed.push((path.clone(), error));
            }
        }
    }
    Ok((archived, failed))
}

/// Name of the zip entry for an absolute source path.
#[must_use]
pub fn entry_name(path: &str) -> &str {
    path.trim_start_matches('/')
}

fn add_entry<W: Write + Seek>(zip: &mut ZipWriter<W>, path: &str) -> Result<()> {
    let mut source = File::open(path)?;
    let size = source.metadata()?.len();
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(size >= u64::from(u32::MAX));

    zip.start_file(entry_name(path), options)?;
    if let Err(e) = io::copy(&mut source, zip) {
        // Drop the partial entry so the container only holds complete files.
        zip.abort_file()?;
        return Err(e.into());
    }
    Ok(())
}
