//! FNG Bot Web Server - Slack webhook receiver.
//!
//! Serves `POST /fngbot` for Slack slash commands and interactivity, and
//! `GET /health`. Configuration is re-read from the environment on every
//! request; only the listen port is fixed at startup.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fngbot::{create_router, AppState, Config, ConfigSource, Services};

#[tokio::main]
async fn main() -> Result<()> {
    // The filter comes from the `debug` flag, so configuration is read first
    let config = Config::from_env();

    // Initialize structured JSON logging
    let filter = EnvFilter::try_new(config.log_filter_directive())
        .unwrap_or_else(|_| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");
    info!(
        port = config.port,
        f3_region = %config.f3_region,
        signing_secret_configured = !config.slack_signing_secret.is_empty(),
        ses_region = %config.ses_region,
        log_level = ?config.log_level,
        "config_loaded"
    );

    let client = Client::builder()
        .pool_max_idle_per_host(16)
        .build()
        .context("Failed to create HTTP client")?;

    let state = AppState::new(ConfigSource::Env, Services::live(client));
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
