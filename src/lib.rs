// Pedantic lint configuration for the crate.
// Most of these are reasonable but too strict for this codebase:
// - cast_possible_truncation / cast_sign_loss: SQLite COUNT(*) is never negative
// - cast_possible_wrap: sizes are range-checked before they reach SQLite
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Panics are rare and documented inline
// - items_after_statements: Output structs are clearer near their usage
// - module_name_repetitions: `ScanResult` in `reconciler` reads better than `Result`
// - needless_pass_by_value: Sometimes clearer semantically
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value
)]

pub mod archiver;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod operations;
pub mod reconcile;
pub mod reconciler;
