//! Error types for the pipeline crate.

use thiserror::Error;

/// Errors raised while building the training set
#[derive(Error, Debug)]
pub enum PipelineError {
    /// There is nothing to train on
    #[error("Cannot build a training set from an empty catalog")]
    EmptyCatalog,

    /// A label was never seen when the encoder was fitted
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// A class index outside the fitted range
    #[error("Unknown class index {index} (encoder knows {classes} classes)")]
    UnknownClass { index: usize, classes: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PipelineError>;
