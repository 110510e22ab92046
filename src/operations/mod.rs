//! Operations behind each CLI command.
//!
//! Turns core results into serializable output so `main.rs` only parses
//! arguments and prints.

pub mod archive;
pub mod list;
pub mod scan;
pub mod status;

pub use archive::{ArchiveOutput, FailedEntry};
pub use list::{list_files, ListEntry, ListResult};
pub use scan::ScanOutput;
pub use status::{get_status, render_table, StateCount, StatusResult};
