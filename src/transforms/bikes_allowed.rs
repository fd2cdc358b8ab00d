//! Adds or repairs the `bikes_allowed` column on trips.txt.
//!
//! GTFS bikes_allowed values: empty/0 undefined, 1 allowed, 2 not allowed.
//! Undefined values are rewritten to allowed.

use crate::error::FixError;
use crate::report::ColumnChange;
use crate::table::{parse_rows, write_rows};

pub const COLUMN: &str = "bikes_allowed";

const VALID_VALUES: &[&str] = &["", "0", "1", "2"];

/// Adds the `bikes_allowed` column with every value set to `1`, or repairs
/// an existing one.
///
/// With `exists_ok` set, an existing column is accepted and its undefined
/// values (empty or `0`) are rewritten to `1`. Without it, an existing
/// column is a schema violation.
///
/// # Errors
///
/// Fails on malformed CSV, on an existing column when `exists_ok` is false,
/// or on a cell value outside the documented domain.
pub fn add_bikes_allowed(text: &str, exists_ok: bool) -> Result<(String, ColumnChange), FixError> {
    let mut rows = parse_rows(text)?;
    let header = rows.first().ok_or(FixError::MissingHeader("trips.txt"))?;
    let rows_total = rows.len() - 1;

    match header.iter().position(|column| column == COLUMN) {
        None => {
            rows[0].push(COLUMN.to_string());
            for row in &mut rows[1..] {
                row.push("1".to_string());
            }

            let change = ColumnChange {
                column_added: true,
                rows_total,
                rows_changed: rows_total,
            };
            Ok((write_rows(&rows)?, change))
        }
        Some(_) if !exists_ok => Err(FixError::UnexpectedColumn(COLUMN.to_string())),
        Some(index) => {
            let mut rows_changed = 0;
            for row in &mut rows[1..] {
                let value = row[index].as_str();
                if !VALID_VALUES.contains(&value) {
                    return Err(FixError::UnexpectedValue {
                        column: COLUMN,
                        value: value.to_string(),
                        expected: VALID_VALUES,
                    });
                }
                if value.is_empty() || value == "0" {
                    // Undefined. We set it to allowed.
                    row[index] = "1".to_string();
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
    }
}
