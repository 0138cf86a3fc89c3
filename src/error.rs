use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CatalogueError – everything that can go wrong loading or querying data
// ---------------------------------------------------------------------------

/// Errors raised while reading, writing, or querying a dataset.
///
/// `what` names the kind of file involved ("coastline", "plate-boundary",
/// "earthquake") so messages read the same regardless of format.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("could not access {what} file '{}': {source}", .path.display())]
    Io {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {what} file '{}': {source}", .path.display())]
    Malformed {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid JSON in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected JSON layout in '{}': {message}", .path.display())]
    JsonShape { path: PathBuf, message: String },

    #[error("parquet error in '{}': {source}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("arrow error in '{}': {source}", .path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("catalogue is missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("row {row} is out of range for a catalogue of {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("{what} file '{}' line {line}: expected {expected} fields, found {found}", .path.display())]
    FieldCount {
        what: &'static str,
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: unparseable time value '{value}'")]
    InvalidTime { row: usize, value: String },

    #[error("row {row}: missing time value")]
    MissingTime { row: usize },
}

impl CatalogueError {
    /// Split a CSV error into an I/O failure or a structural one.
    pub(crate) fn from_csv(what: &'static str, path: PathBuf, err: csv::Error) -> Self {
        if !err.is_io_error() {
            return CatalogueError::Malformed {
                what,
                path,
                source: err,
            };
        }
        let source = match err.into_kind() {
            csv::ErrorKind::Io(source) => source,
            other => std::io::Error::other(format!("{other:?}")),
        };
        CatalogueError::Io { what, path, source }
    }
}

pub type Result<T> = std::result::Result<T, CatalogueError>;
