pub mod hasher;
pub mod scanner;

pub use scanner::{ScanEntry, ScanOutcome, ScannedFile, Scanner};
