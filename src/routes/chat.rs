//! Chatbot route
//!
//! Forwards the user message (and any prior turns) to the chatbot script as
//! one JSON line and returns the script's stdout as the reply. The chatbot
//! contract is tolerant: stderr is logged, never fatal. An empty reply is.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::bridge::{resolve_outcome, run_script, ScriptJob};
use crate::error::ChatError;
use crate::server::AppState;

/// Request body for `/chat`. `history` is forwarded to the script verbatim;
/// the server does not interpret prior turns.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Option<Value>,
}

/// Response body for `/chat`
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

pub async fn post_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ChatError> {
    info!("Received chat message ({} bytes)", request.message.len());

    let interpreter = state
        .interpreter()
        .await
        .ok_or(ChatError::InterpreterMissing)?;

    let mut payload = Map::new();
    payload.insert("message".to_string(), Value::String(request.message));
    if let Some(history) = request.history {
        payload.insert("history".to_string(), history);
    }

    let job = ScriptJob::new(
        interpreter,
        state.config.chat_script(),
        Value::Object(payload).to_string(),
    )
    .with_timeout(state.config.script_timeout);

    let output = run_script(&job).await?;
    if !output.stderr.is_empty() {
        warn!("Chat script stderr: {}", output.stderr.trim());
    }

    let reply = resolve_outcome(output, state.config.chat_policy)?;
    Ok(Json(ChatReply { reply }))
}

#[cfg(test)]
mod tests {
    use crate::bridge::VersionProbe;
    use crate::config::AppConfig;
    use crate::error::INTERPRETER_MISSING_MSG;
    use crate::server::{build_router, AppState};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Stand the chat route up against a shell stub named chatbot.py.
    fn chat_app(dir: &tempfile::TempDir, script: &str) -> Router {
        std::fs::write(dir.path().join("chatbot.py"), script).unwrap();
        let config = AppConfig {
            scripts_dir: dir.path().to_path_buf(),
            interpreter_override: Some("sh".to_string()),
            ..AppConfig::default()
        };
        build_router(AppState::new(config).unwrap())
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_replies_with_trimmed_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let app = chat_app(&dir, "echo '  Compound interest grows savings.  '\n");

        let response = app
            .oneshot(chat_request(r#"{"message":"hi","history":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["reply"], "Compound interest grows savings.");
    }

    #[tokio::test]
    async fn test_stderr_alone_does_not_fail_the_chat() {
        let dir = tempfile::tempdir().unwrap();
        let app = chat_app(&dir, "echo 'model fallback' >&2\necho 'Hello.'\n");

        let response = app
            .oneshot(chat_request(r#"{"message":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["reply"], "Hello.");
    }

    #[tokio::test]
    async fn test_empty_reply_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = chat_app(&dir, "exit 0\n");

        let response = app
            .oneshot(chat_request(r#"{"message":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "AI failed to respond.");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = chat_app(&dir, "echo 'Python Error: boom' >&2\nexit 1\n");

        let response = app
            .oneshot(chat_request(r#"{"message":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "AI failed to respond.");
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_a_server_error() {
        struct RejectAll;

        #[async_trait]
        impl VersionProbe for RejectAll {
            async fn check(&self, _cmd: &str) -> bool {
                false
            }
        }

        let state = AppState::new(AppConfig::default())
            .unwrap()
            .with_probe(Arc::new(RejectAll));
        let app = build_router(state);

        let response = app
            .oneshot(chat_request(r#"{"message":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], INTERPRETER_MISSING_MSG);
    }
}
