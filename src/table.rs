//! CSV parsing and serialization for GTFS tables.
//!
//! Row 0 is the header row; every row must have the same field count.
//! Output uses minimal quoting, matching what GTFS consumers expect.

use std::io;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::FixError;

/// A table as an ordered list of rows, each an ordered list of fields.
pub type Rows = Vec<Vec<String>>;

/// Parses CSV text into a [`Rows`] value, header row included.
///
/// # Errors
///
/// Returns an error if the text is not well-formed CSV or the rows have
/// inconsistent field counts.
pub fn parse_rows(text: &str) -> Result<Rows, FixError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

/// Serializes [`Rows`] back to CSV text with minimal quoting.
pub fn write_rows(rows: &Rows) -> Result<String, FixError> {
    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new().from_writer(&mut buffer);
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }

    let text = String::from_utf8(buffer).map_err(io::Error::other)?;
    Ok(text)
}
