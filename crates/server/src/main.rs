//! HTTP entry point for the catalog rating predictor.
//!
//! Trains the model once at startup, then serves `GET /` and
//! `POST /predict` on the loopback interface.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use server::serve::serve;
use server::{AppState, PredictionService, Settings, TrainingConfig, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().context("Reading settings")?;
    info!("Starting catalog rating server");

    info!("Training model from {}...", settings.catalog_path.display());
    let path = settings.catalog_path.clone();
    let trained = tokio::task::spawn_blocking(move || {
        PredictionService::from_csv(&path, &TrainingConfig::default())
    })
    .await
    .context("Training task failed")?;

    let predictor = match trained {
        Ok(service) => Some(service),
        Err(e) if e.is_missing_file() => {
            error!(
                "{} not found; predictions are unavailable",
                settings.catalog_path.display()
            );
            None
        }
        Err(e) => {
            error!("Training failed, predictions are unavailable: {}", e);
            None
        }
    };

    let app = build_router(Arc::new(AppState::new(predictor)));
    serve(app, &settings).await?;

    Ok(())
}
