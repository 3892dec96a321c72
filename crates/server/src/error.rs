//! Error types for the server crate.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use classifier::ClassifierError;
use data_loader::DataLoadError;
use pipeline::PipelineError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Startup and listener failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that stops the model from being trained at startup
#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Failed to load catalog: {0}")]
    Load(#[from] DataLoadError),

    #[error("Failed to build training set: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Failed to fit model: {0}")]
    Model(#[from] ClassifierError),
}

impl TrainingError {
    /// True when the catalog file simply does not exist
    pub fn is_missing_file(&self) -> bool {
        matches!(self, TrainingError::Load(e) if e.is_not_found())
    }
}

/// Errors returned to HTTP clients as `{"error": message}`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Model not loaded.")]
    ModelNotLoaded,

    #[error("{0}")]
    BadRequest(String),

    #[error("Duration must be between 1 and {max}.")]
    InvalidDuration { max: f64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelNotLoaded | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) | ApiError::InvalidDuration { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ClassifierError> for ApiError {
    fn from(e: ClassifierError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
