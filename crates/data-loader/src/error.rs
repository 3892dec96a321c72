//! Error types for the data-loader crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - Enum variants for different error cases
//! - Error messages with context

use thiserror::Error;

/// Errors that can occur while loading the catalog CSV
///
/// `FileNotFound` is kept apart from the generic I/O case because it is the
/// one failure the service treats as "expected": it is logged and the model
/// simply stays unavailable.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected a record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column the feature builder depends on is absent from the header
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field} at row {row}: {value}")]
    InvalidValue {
        field: String,
        row: usize,
        value: String,
    },

    /// The file parsed but contained no rows
    #[error("Dataset {0} contains no rows")]
    Empty(String),
}

impl DataLoadError {
    /// True for the missing-file case
    pub fn is_not_found(&self) -> bool {
        match self {
            DataLoadError::FileNotFound { .. } => true,
            DataLoadError::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
