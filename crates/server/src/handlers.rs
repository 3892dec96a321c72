//! HTTP handlers.

use crate::error::ApiError;
use crate::predictor::{Prediction, PredictionRequest};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;
use tracing::info;

pub const LIVENESS_MESSAGE: &str = "✅ Netflix Prediction + Recommendation API running!";

/// Handler for GET /
pub async fn home_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// Handler for POST /predict
///
/// The model check comes before body validation, so an unloaded model
/// answers 500 even for malformed requests.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let predictor = state.predictor()?;
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let prediction = predictor.predict(&request, &mut rand::rng())?;
    info!(
        "Predicted {} for genre {:?}, duration {}",
        prediction.prediction, request.genre, request.duration
    );
    Ok(Json(prediction))
}
