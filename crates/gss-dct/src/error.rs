//! Error types for dictionary parsing and fixed-width decoding.

use std::path::PathBuf;
use thiserror::Error;

use gss_model::LayoutError;

/// Errors that can occur when reading a dictionary or a fixed-width file.
#[derive(Debug, Error)]
pub enum DctError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// `_column(...)` content is not a positive integer.
    #[error("malformed _column marker on line {line}: {content:?}")]
    MalformedColumnMarker { line: usize, content: String },

    /// Declared storage type outside the recognized set.
    #[error("unknown type {token:?} on line {line}")]
    UnknownType { line: usize, token: String },

    /// Parsed fields violate the layout invariants.
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    /// Record has the wrong number of values for the layout.
    #[error("row length mismatch: expected {expected}, got {actual}")]
    RowLengthMismatch { expected: usize, actual: usize },

    /// Value does not fit in its field width.
    #[error("value {value:?} does not fit field {name} of width {width}")]
    ValueTooWide {
        name: String,
        value: String,
        width: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// DataFrame construction failed.
    #[error("dataframe error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type alias for dictionary and decode operations.
pub type Result<T> = std::result::Result<T, DctError>;

impl DctError {
    pub fn malformed_column_marker(line: usize, content: impl Into<String>) -> Self {
        Self::MalformedColumnMarker {
            line,
            content: content.into(),
        }
    }

    pub fn unknown_type(line: usize, token: impl Into<String>) -> Self {
        Self::UnknownType {
            line,
            token: token.into(),
        }
    }

    /// Map an open failure to [`DctError::FileNotFound`] when the path is missing.
    pub(crate) fn open(path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(error)
        }
    }
}
