//! HTTP server assembly
//!
//! Owns the shared application state, builds the router, and runs the
//! listener with graceful shutdown. Handlers live in `routes`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::bridge::interpreter;
use crate::bridge::{SystemProbe, VersionProbe, INTERPRETER_CANDIDATES};
use crate::config::AppConfig;
use crate::news::NewsClient;
use crate::routes;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub news: NewsClient,
    probe: Arc<dyn VersionProbe>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let news = NewsClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            news,
            probe: Arc::new(SystemProbe),
        })
    }

    /// Replace the version probe (tests stub discovery through this)
    #[cfg(test)]
    pub fn with_probe(mut self, probe: Arc<dyn VersionProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Resolve the interpreter for one invocation: the configured override
    /// when set, otherwise a fresh PATH probe.
    pub async fn interpreter(&self) -> Option<String> {
        if let Some(cmd) = &self.config.interpreter_override {
            return Some(cmd.clone());
        }

        let resolved = interpreter::resolve_with(self.probe.as_ref(), INTERPRETER_CANDIDATES).await;
        if resolved.is_none() {
            error!(
                "Python executable not found on PATH. Tried: {}",
                INTERPRETER_CANDIDATES.join(", ")
            );
        }
        resolved
    }
}

/// Assemble the application router
pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(state.config.public_dir.clone());

    Router::new()
        .route("/", get(routes::pages::homepage))
        .route("/quiz.html", get(routes::pages::quiz_page))
        .route("/chatbot.html", get(routes::pages::chatbot_page))
        .route("/index.html", get(routes::pages::index_redirect))
        .route("/api/news", get(routes::news::get_news))
        .route("/chat", post(routes::chat::post_chat))
        .route("/run-quiz", post(routes::quiz::run_quiz))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured port and serve until shutdown. A failed bind is the
/// only error fatal to the process.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let port = state.config.port;
    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running at http://localhost:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
