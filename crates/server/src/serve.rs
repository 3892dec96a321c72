use crate::config::Settings;
use crate::error::ServerError;
use axum::Router;
use tokio::signal;
use tracing::{info, warn};

/// Bind the listener and serve until Ctrl+C or SIGTERM.
pub async fn serve(app: Router, settings: &Settings) -> Result<(), ServerError> {
    let address = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| ServerError::Bind {
            address: address.to_string(),
            source: e,
        })?;
    info!("Server listening on http://{}", listener.local_addr()?);
    info!("  - GET  /         (liveness)");
    info!("  - POST /predict  (rating prediction)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
