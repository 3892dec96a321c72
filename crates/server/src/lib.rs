//! Server crate for the catalog rating predictor.
//!
//! This crate contains the prediction service that ties the trained model
//! to the HTTP API, plus the axum plumbing around it:
//! - `config`: settings from the environment
//! - `predictor`: request -> feature row -> rating bucket
//! - `overrides`: genre rules applied after the model
//! - `state`, `handlers`, `router`, `serve`: the HTTP surface

pub mod config;
pub mod error;
pub mod handlers;
pub mod overrides;
pub mod predictor;
pub mod router;
pub mod serve;
pub mod state;

pub use config::Settings;
pub use error::{ApiError, ServerError, TrainingError};
pub use predictor::{
    Prediction, PredictionRequest, PredictionService, PredictorConfig, TrainingConfig,
};
pub use router::build_router;
pub use state::AppState;
