pub mod file;
pub mod fingerprint;

pub use file::{FileRecord, FileState};
pub use fingerprint::{Fingerprint, ScanMode};
