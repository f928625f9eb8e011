mod api;
mod backend;
mod config;
mod dashboard;
mod error;
mod page;
mod refresher;
mod render;

use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use anyhow::{Context, Result};
use crate::backend::HttpAreaSource;
use crate::config::Config;
use crate::dashboard::Readiness;
use crate::page::Page;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("area_dashboardd=info"))
        )
        .init();

    tracing::info!("Starting area-dashboardd");

    // Load config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/area-dashboard/dashboardd.toml".to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    tracing::info!("Loaded config from {}", config_path);

    let areas_url = config.backend.areas_url();
    let source = Arc::new(HttpAreaSource::new(areas_url));
    tracing::info!("Polling areas from {}", source.url());

    // Polling starts once the page can be served
    let page = Page::standard();
    let (loaded_tx, loaded_rx) = oneshot::channel();
    let starting = tokio::spawn(dashboard::start_when_ready(
        Readiness::Loading(loaded_rx),
        source,
        page.clone(),
        config.timing(),
    ));

    // Bind HTTP server
    let listener = tokio::net::TcpListener::bind(&config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("Dashboard listening on {}", config.api.listen);

    let _ = loaded_tx.send(());
    let handle = starting
        .await
        .context("Dashboard start task failed")?
        .context("Dashboard did not start")?;

    // Build API router
    let app_state = api::routes::AppState {
        page,
        state_rx: handle.refresh_state(),
        refresh_interval_secs: config.refresh.interval_secs,
        label_tick_secs: config.refresh.label_tick_secs,
    };
    let app = api::routes::router(app_state);

    // Run server with graceful shutdown
    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");

    cancel.cancel();
    handle.teardown().await;
    let _ = server_handle.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
