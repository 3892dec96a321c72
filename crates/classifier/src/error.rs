//! Error types for fitting and querying classifiers.

use thiserror::Error;

/// Errors that can occur when fitting or querying a classifier
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Cannot fit a classifier on an empty training set")]
    EmptyTrainingSet,

    #[error("Got {rows} feature rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("Expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("Target {label} is outside 0..{n_classes}")]
    InvalidLabel { label: usize, n_classes: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ClassifierError>;
