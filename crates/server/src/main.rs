mod proxy;
mod routes;
mod state;

use std::{
    fs::{self, OpenOptions},
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use fortshop_core::{
    config::{self, AppConfig},
    Upstream, UpstreamClient,
};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    if config.api_key.is_empty() {
        warn!("FORTNITE_API_KEY is not set; upstream requests will be unauthenticated");
    }

    let upstream: Arc<dyn Upstream> = Arc::new(UpstreamClient::from_config(&config));
    let port = config.port;
    let router = routes::build_router(Arc::new(AppState::new(config, upstream)))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("FortShop running on port {port}");

    axum::serve(listener, router)
        .await
        .context("HTTP server terminated")
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("fortshop.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
