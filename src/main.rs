//! Property History Server - Binary Entry Point
//!
//! Serves the REST API. Configuration comes from `HISTORY_*` environment
//! variables; log filtering from `RUST_LOG`.

use std::sync::Arc;

use property_history::api::{create_router, AppState};
use property_history::telemetry::init_tracing;
use property_history::{HistoryService, ServiceConfig, NAME, VERSION};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ServiceConfig::from_env();
    tracing::info!(
        service = NAME,
        version = VERSION,
        data_dir = ?config.data_dir,
        "starting property history server"
    );

    let service = Arc::new(HistoryService::open(config.clone())?);
    let app = create_router(Arc::new(AppState::new(service)));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(address = %config.bind_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
