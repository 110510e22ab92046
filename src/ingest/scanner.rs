use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::error::{ArchiveError, Result};
use crate::ingest::hasher::{self, DEFAULT_BUFFER_SIZE};
use crate::models::{Fingerprint, ScanMode};

/// A file observed on disk with its change-detection value.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute path, valid UTF-8.
    pub path: String,
    pub fingerprint: Fingerprint,
    pub size: u64,
    /// Last-modified time as seconds since the Unix epoch.
    pub modified: f64,
}

/// Per-file result of fingerprinting.
#[derive(Debug, Clone)]
pub enum ScanEntry {
    Scanned(ScannedFile),
    /// The file was seen during the walk but could not be read.
    Failed { path: String, error: String },
}

impl ScanEntry {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            ScanEntry::Scanned(f) => &f.path,
            ScanEntry::Failed { path, .. } => path,
        }
    }
}

/// Everything learned from one walk of a root.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Fingerprinted files, sorted by path.
    pub entries: Vec<ScanEntry>,
    /// Every absolute path the walk visited, including failed ones.
    pub observed: BTreeSet<String>,
    /// Directories (or other walk nodes) that could not be read.
    pub unreadable: Vec<String>,
    /// Files skipped because their path is not valid UTF-8.
    pub non_utf8: Vec<PathBuf>,
}

/// Recursive file scanner over a single root.
///
/// The walk itself is sequential; fingerprinting runs on the rayon pool.
pub struct Scanner {
    root: PathBuf,
    mode: ScanMode,
    buffer_size: usize,
    exclude: Vec<PathBuf>,
}

impl Scanner {
    /// Create a scanner for `root`, resolved to a normalized absolute path.
    ///
    /// Fails with [`ArchiveError::RootNotFound`] if the root does not exist.
    pub fn new(root: impl AsRef<Path>, mode: ScanMode) -> Result<Self> {
        let root = normalize_path(&std::path::absolute(root.as_ref())?);
        if !root.exists() {
            return Err(ArchiveError::RootNotFound { path: root });
        }
        Ok(Self {
            root,
            mode,
            buffer_size: DEFAULT_BUFFER_SIZE,
            exclude: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Never fingerprint the given files (the catalog's own database).
    #[must_use]
    pub fn excluding(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.exclude.extend(paths);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Walk the tree and fingerprint every regular file.
    ///
    /// Symlinks are not followed into directories. A symlink that resolves
    /// to a regular file is catalogued under its own path; a dangling one is
    /// observed and reported as a failed read.
    pub fn scan(&self) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("cannot read {e}; skipping");
                    outcome.unreadable.push(e.to_string());
                    continue;
                }
            };
            let Some(ft) = entry.file_type() else {
                continue;
            };
            if ft.is_symlink() {
                match entry.path().metadata() {
                    Ok(meta) if !meta.is_file() => continue,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(path = %entry.path().display(), "dangling symlink: {e}");
                    }
                }
            } else if !ft.is_file() {
                continue;
            }
            let path = entry.into_path();
            if self.exclude.iter().any(|x| x == &path) {
                continue;
            }
            match path.to_str() {
                Some(s) => {
                    outcome.observed.insert(s.to_string());
                    files.push(s.to_string());
                }
                None => {
                    tracing::warn!(path = %path.display(), "path is not valid UTF-8; skipping");
                    outcome.non_utf8.push(path);
                }
            }
        }

        let mode = self.mode;
        let buffer_size = self.buffer_size;
        let mut entries: Vec<ScanEntry> = files
            .into_par_iter()
            .map(|path| match fingerprint(Path::new(&path), mode, buffer_size) {
                Ok((fingerprint, size, modified)) => ScanEntry::Scanned(ScannedFile {
                    path,
                    fingerprint,
                    size,
                    modified,
                }),
                Err(e) => ScanEntry::Failed {
                    path,
                    error: e.to_string(),
                },
            })
            .collect();
        entries.sort_by(|a, b| a.path().cmp(b.path()));
        outcome.entries = entries;
        outcome
    }
}

/// Compute the fingerprint, size and mtime of one file.
pub fn fingerprint(path: &Path, mode: ScanMode, buffer_size: usize) -> Result<(Fingerprint, u64, f64)> {
    let meta = path.metadata()?;
    let modified = epoch_seconds(meta.modified()?);
    let fingerprint = match mode {
        ScanMode::Hash => Fingerprint::Hash(hasher::hash_file(path, buffer_size)?),
        ScanMode::Mtime => Fingerprint::Mtime(modified),
    };
    Ok((fingerprint, meta.len(), modified))
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root, matching how the kernel resolves it.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => out.push(component),
        }
    }
    out
}

fn epoch_seconds(t: SystemTime) -> f64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}
