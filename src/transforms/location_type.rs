//! Rewrites the `location_type` column on stops.txt.
//!
//! Entrance/exit stops (`location_type` 2) are rewritten to plain stops (0)
//! for consumers that cannot handle station entrances.

use crate::error::FixError;
use crate::report::ColumnChange;
use crate::table::{parse_rows, write_rows};

pub const COLUMN: &str = "location_type";

/// Rewrites every `location_type` value of `2` to `0`.
///
/// A table without a `location_type` column is returned unchanged with a
/// zero-change report.
pub fn rewrite_location_type(text: &str) -> Result<(String, ColumnChange), FixError> {
    let mut rows = parse_rows(text)?;

    let index = rows
        .first()
        .and_then(|header| header.iter().position(|column| column == COLUMN));
    let Some(index) = index else {
        return Ok((text.to_string(), ColumnChange::default()));
    };

    let rows_total = rows.len() - 1;
    let mut rows_changed = 0;
    for row in &mut rows[1..] {
        if row[index] == "2" {
            row[index] = "0".to_string();
            rows_changed += 1;
        }
    }

    let change = ColumnChange {
        column_added: false,
        rows_total,
        rows_changed,
    };
    Ok((write_rows(&rows)?, change))
}
