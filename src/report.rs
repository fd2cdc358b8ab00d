//! Run and per-table change statistics.
//!
//! Transformation functions stay pure and return these counts; the CLI
//! wiring logs them and prints the final summary as JSON.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

/// What a column transformation did to one table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnChange {
    /// True when the column was newly appended rather than repaired.
    pub column_added: bool,
    /// Number of data rows in the table (header excluded).
    pub rows_total: usize,
    /// Number of data rows whose value was rewritten.
    pub rows_changed: usize,
}

impl ColumnChange {
    /// Percentage of data rows that were rewritten.
    pub fn changed_pct(&self) -> f64 {
        pct(self.rows_changed, self.rows_total)
    }
}

/// Totals for one pipeline run over an archive.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    /// Entries seen in the source archive.
    pub entries: usize,
    /// Entries copied verbatim.
    pub copied: usize,
    /// Entries rewritten by a transformation chain.
    pub transformed: usize,
    /// Entries omitted from the target archive.
    pub deleted: usize,
}

pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Logs the run summary as pretty-printed JSON.
pub fn print_json(summary: &RunSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
