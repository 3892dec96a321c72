use crate::error::ApiError;
use crate::predictor::PredictionService;
use std::sync::Arc;

/// Shared application state.
///
/// Built once before the listener is bound and never mutated afterwards.
/// `predictor` is `None` when training failed at startup.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    predictor: Option<Arc<PredictionService>>,
}

impl AppState {
    pub fn new(predictor: Option<PredictionService>) -> Self {
        Self {
            predictor: predictor.map(Arc::new),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.predictor.is_some()
    }

    /// The trained service, or the error every prediction gets without one
    pub fn predictor(&self) -> Result<&PredictionService, ApiError> {
        self.predictor.as_deref().ok_or(ApiError::ModelNotLoaded)
    }
}
