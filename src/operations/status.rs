//! Catalog status aggregation.

use std::fmt::Write as _;

use serde::Serialize;

use crate::db::Database;
use crate::error::Result;
use crate::models::FileState;

/// Row counts of the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    /// Count per state, in lifecycle order; states with no rows are omitted.
    pub states: Vec<StateCount>,
    /// Rows not currently eligible for archival.
    pub ineligible: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateCount {
    pub state: FileState,
    pub count: u64,
}

/// Aggregate the catalog by state.
pub fn get_status(db: &Database) -> Result<StatusResult> {
    let counts = db.counts_by_state()?;
    let (total, ineligible) = db.totals()?;
    Ok(StatusResult {
        states: counts
            .into_iter()
            .map(|(state, count)| StateCount { state, count })
            .collect(),
        ineligible,
        total,
    })
}

/// Render status as a human-readable table.
#[must_use]
pub fn render_table(status: &StatusResult) -> String {
    if status.total == 0 {
        return "DATABASE EMPTY".to_string();
    }
    let mut out = String::from("===============\nSTATUS OF FILES\n===============\n");
    for sc in &status.states {
        let _ = writeln!(out, "{}: {}", capitalize(sc.state.as_str()), sc.count);
    }
    let _ = writeln!(out, "---------------");
    let _ = writeln!(out, "Ineligible: {}", status.ineligible);
    let _ = write!(out, "Total: {}", status.total);
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
