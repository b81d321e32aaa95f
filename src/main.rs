//! FinLit web backend
//!
//! Serves the static site, proxies the market news provider, and runs the
//! quiz scorer and chatbot Python scripts through a per-request subprocess
//! bridge.

mod bridge;
mod config;
mod error;
mod news;
mod routes;
mod server;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("finlit=info".parse()?))
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    info!(
        "Starting FinLit server (port={}, scripts_dir={:?}, public_dir={:?})",
        config.port, config.scripts_dir, config.public_dir
    );
    if config.news_api_key == AppConfig::default().news_api_key {
        info!("ALPHAVANTAGE_KEY not set; news requests will use the placeholder key");
    }

    let state = AppState::new(config)?;
    server::serve(state).await
}
