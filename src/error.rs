//! Error types shared by the table transformations and the archive pipeline.

use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Any failure is fatal to the whole run; there is no warning tier.
#[derive(Debug, Error)]
pub enum FixError {
    /// The caller asked to add a column that is already present.
    #[error("expected the `{0}` column to be missing")]
    UnexpectedColumn(String),

    /// A cell value outside the documented domain for the column.
    #[error("the value `{value}` is not one of the expected values {expected:?} for the `{column}` field")]
    UnexpectedValue {
        column: &'static str,
        value: String,
        expected: &'static [&'static str],
    },

    /// The table has no header row to work with.
    #[error("`{0}` is empty: missing header row")]
    MissingHeader(&'static str),

    /// An entry selected for transformation is not valid UTF-8 text.
    #[error("entry `{entry}` is not valid UTF-8")]
    InvalidUtf8 {
        entry: String,
        #[source]
        source: FromUtf8Error,
    },

    /// Wraps a chain failure with the name of the entry being transformed.
    #[error("failed to transform entry `{entry}`")]
    Transform {
        entry: String,
        #[source]
        source: Box<FixError>,
    },

    /// The same file name was passed twice to one repeatable option.
    #[error("duplicate file name `{0}` passed to the same option")]
    DuplicateTarget(String),

    /// A targeted file name does not look like a GTFS table.
    #[error("`{0}` does not name a GTFS table (expected a `.txt` file)")]
    InvalidTarget(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
