//! Static page routes
//!
//! The landing, quiz, and chatbot pages are explicit routes so each serve is
//! logged. Everything else under the public directory (styles, scripts,
//! images) is handled by the static fallback service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::{info, warn};

use crate::server::AppState;

pub async fn homepage(State(state): State<AppState>) -> Response {
    info!("Serving homepage");
    serve_page(&state, "homepage.html").await
}

pub async fn quiz_page(State(state): State<AppState>) -> Response {
    info!("Serving /quiz.html");
    serve_page(&state, "quiz.html").await
}

pub async fn chatbot_page(State(state): State<AppState>) -> Response {
    info!("Serving /chatbot.html");
    serve_page(&state, "chatbot.html").await
}

/// Old bookmarks land on /index.html; the quiz page replaced it.
pub async fn index_redirect() -> Redirect {
    info!("Redirecting /index.html to /quiz.html");
    Redirect::to("/quiz.html")
}

async fn serve_page(state: &AppState, file: &str) -> Response {
    let path = state.config.public_dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            warn!("Failed to read page {:?}: {}", path, err);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
