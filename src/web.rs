use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::NarratorConfig;
use crate::provider;

pub async fn run(config: &NarratorConfig) -> Result<()> {
    let source = provider::source_from_config(&config.accuweather)?;
    let state = AppState::from_config(config, source)?;

    let app = api::router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Weather narrator listening at http://localhost:{}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
