use clap::{Parser, Subcommand, ValueEnum};

use crate::models::{FileState, ScanMode};

#[derive(Parser)]
#[command(
    name = "archive-tool",
    version,
    about = "Catalog files under directory trees and pack eligible ones into zip archives",
    after_help = "The catalog lives in ./archive-tool.sqlite3 unless --db is given. \
                  Settings are read from ./archive-tool.toml. Progress is logged to \
                  stderr; set RUST_LOG to change verbosity."
)]
pub struct Cli {
    /// Catalog database path (relative to the working directory)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the catalog if it does not exist yet
    Init,

    /// Scan a directory tree and reconcile it with the catalog.
    ///
    /// New files are added, changed files are re-evaluated, and catalogued
    /// files under the path that no longer exist are marked as errors.
    Scan {
        /// Directory (or single file) to scan
        path: String,
        /// Change detection: content hash or modification time
        #[arg(long, value_enum)]
        mode: Option<ScanMode>,
    },

    /// Pack every eligible, not yet archived file into a zip archive
    Archive {
        /// Archive filename, created in the working directory
        filename: String,
    },

    /// Show catalog counts by state
    Status {
        /// Output as JSON regardless of settings
        #[arg(long)]
        json: bool,
    },

    /// List catalogued files
    List {
        /// Only files in this state
        #[arg(long, value_enum)]
        state: Option<StateArg>,
        /// Only files currently eligible for archival
        #[arg(long)]
        eligible: bool,
    },
}

/// CLI spelling of a catalog state.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateArg {
    NewScanned,
    UpdatedScanned,
    Archived,
    Error,
}

impl From<StateArg> for FileState {
    fn from(s: StateArg) -> Self {
        match s {
            StateArg::NewScanned => FileState::NewScanned,
            StateArg::UpdatedScanned => FileState::UpdatedScanned,
            StateArg::Archived => FileState::Archived,
            StateArg::Error => FileState::Error,
        }
    }
}
