//! Quiz scoring route
//!
//! Validates that exactly five answers arrived, forwards them to the scorer
//! script as a JSON array, and returns the script's raw stdout. The scorer
//! contract is strict: any stderr output fails the run even on exit code 0.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::bridge::{resolve_outcome, run_script, ScriptJob};
use crate::error::QuizError;
use crate::server::AppState;

/// Number of answers the scorer expects
const QUIZ_ANSWER_COUNT: usize = 5;

/// Request body for `/run-quiz`. Answers may be strings or option indexes;
/// they are forwarded untouched.
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub answers: Vec<Value>,
}

pub async fn run_quiz(
    State(state): State<AppState>,
    Json(request): Json<QuizRequest>,
) -> Result<String, QuizError> {
    if request.answers.len() != QUIZ_ANSWER_COUNT {
        return Err(QuizError::BadInput);
    }

    let payload = Value::Array(request.answers).to_string();
    info!("Received answers: {}", payload);

    let interpreter = state
        .interpreter()
        .await
        .ok_or(QuizError::InterpreterMissing)?;

    let job = ScriptJob::new(interpreter, state.config.quiz_script(), payload)
        .with_timeout(state.config.script_timeout);

    let output = run_script(&job).await?;
    let result = resolve_outcome(output, state.config.quiz_policy)?;
    Ok(result)
}
