//! Route error types
//!
//! Each route family gets its own error enum because the three surfaces
//! answer failures in different shapes: the news and chat routes reply with
//! JSON `{error}` bodies, the quiz route replies with plain text. Every
//! variant is terminal for its request; nothing here is retried and none of
//! it brings the server down.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::bridge::{BridgeError, ScriptFailure};

/// Message shown when no interpreter candidate answers the version probe
pub const INTERPRETER_MISSING_MSG: &str =
    "FATAL Error: Python executable not found. Please install Python or add it to PATH.";

/// Failures talking to or interpreting the news provider (all HTTP 502)
#[derive(Debug, Error)]
pub enum NewsError {
    /// Network-level failure reaching the provider
    #[error("Error fetching news")]
    Fetch(#[source] reqwest::Error),
    /// Provider body was not JSON
    #[error("Bad response from news provider")]
    BadBody(#[source] reqwest::Error),
    /// Provider answered without a feed, optionally naming its own error
    #[error("{0}")]
    Provider(String),
}

impl IntoResponse for NewsError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_GATEWAY, body).into_response()
    }
}

/// Chat route failures (HTTP 500, JSON `{error}` body)
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{}", INTERPRETER_MISSING_MSG)]
    InterpreterMissing,
    /// Spawn failure, surfaced with the underlying OS error text
    #[error("{0}")]
    Spawn(String),
    /// Script failed, timed out, or produced no reply; detail is logged only
    #[error("AI failed to respond.")]
    Failed,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<BridgeError> for ChatError {
    fn from(err: BridgeError) -> Self {
        error!("Chat invocation failed: {}", err);
        match err {
            BridgeError::Spawn(_) => ChatError::Spawn(err.to_string()),
            BridgeError::Wait(_) | BridgeError::TimedOut { .. } => ChatError::Failed,
        }
    }
}

impl From<ScriptFailure> for ChatError {
    fn from(failure: ScriptFailure) -> Self {
        error!("Chat script failed: {}", failure.message);
        ChatError::Failed
    }
}

/// Quiz route failures (plain-text bodies, matching the quiz page's
/// error rendering)
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Invalid input: Please provide 5 quiz answers.")]
    BadInput,
    #[error("{}", INTERPRETER_MISSING_MSG)]
    InterpreterMissing,
    /// Spawn failure, surfaced with the underlying OS error text
    #[error("{0}")]
    Spawn(String),
    /// Script-reported failure, with whatever stdout was captured
    #[error("Python Script Execution Error:\n{message}\n\nCaptured Output: {stdout}")]
    Script { message: String, stdout: String },
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let status = match self {
            QuizError::BadInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

impl From<BridgeError> for QuizError {
    fn from(err: BridgeError) -> Self {
        error!("Quiz invocation failed: {}", err);
        match err {
            BridgeError::Spawn(_) => QuizError::Spawn(err.to_string()),
            BridgeError::Wait(_) | BridgeError::TimedOut { .. } => QuizError::Script {
                message: err.to_string(),
                stdout: String::new(),
            },
        }
    }
}

impl From<ScriptFailure> for QuizError {
    fn from(failure: ScriptFailure) -> Self {
        error!("Quiz script failed: {}", failure.message);
        QuizError::Script {
            message: failure.message,
            stdout: failure.captured_stdout,
        }
    }
}
