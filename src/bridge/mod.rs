//! Bridge module - request-to-script execution layer
//!
//! This module owns everything between an HTTP handler and a Python child
//! process:
//! - `interpreter`: locates a usable Python executable on PATH
//! - `runner`: spawns the script, feeds it one JSON line, collects output
//! - outcome resolution: maps (exit code, stderr, stdout) to success/failure
//!   under a per-route stream policy
//!
//! The bridge module does NOT:
//! - Validate request payloads (routes do that before invoking)
//! - Know about HTTP status codes or response shapes
//! - Retry or pool child processes

pub mod interpreter;
pub mod runner;

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default wall-clock limit for one script invocation (in seconds)
pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 30;

/// One script invocation: interpreter, target script, and the single
/// JSON payload line written to its stdin.
#[derive(Debug, Clone)]
pub struct ScriptJob {
    /// Resolved interpreter command (e.g. "python3")
    pub interpreter: String,
    /// Path to the script to run
    pub script: PathBuf,
    /// Serialized request payload, written as one line
    pub payload: String,
    /// Wall-clock limit; the child is killed on expiry
    pub timeout: Duration,
}

impl ScriptJob {
    pub fn new(
        interpreter: impl Into<String>,
        script: impl AsRef<Path>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.as_ref().to_path_buf(),
            payload: payload.into(),
            timeout: Duration::from_secs(DEFAULT_SCRIPT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Raw result of a completed invocation (no outcome interpretation)
#[derive(Debug)]
pub struct ScriptOutput {
    /// Exit code (-1 when terminated by a signal)
    pub exit_code: i32,
    /// Accumulated stdout
    pub stdout: String,
    /// Accumulated stderr
    pub stderr: String,
}

impl ScriptOutput {
    /// Check if the child exited with code 0
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Per-route rules for turning a `ScriptOutput` into an outcome.
///
/// The two script contracts differ: the quiz scorer must stay silent on
/// stderr even when it succeeds, while the chatbot may warn on stderr but
/// must produce a non-empty reply on stdout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamPolicy {
    /// Any stderr output fails the invocation, even on exit code 0
    pub strict_stderr: bool,
    /// Exit code 0 with empty (trimmed) stdout fails the invocation;
    /// on success the payload is the trimmed stdout
    pub require_stdout: bool,
}

impl StreamPolicy {
    /// Policy for the quiz scorer script
    pub const fn quiz() -> Self {
        Self {
            strict_stderr: true,
            require_stdout: false,
        }
    }

    /// Policy for the chatbot script
    pub const fn chat() -> Self {
        Self {
            strict_stderr: false,
            require_stdout: true,
        }
    }
}

/// A resolved invocation failure
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptFailure {
    /// Diagnostic text: the script's stderr when present, else a generic
    /// exit/no-output description
    pub message: String,
    /// Stdout captured before the failure, for diagnostic context
    pub captured_stdout: String,
}

/// Map a completed invocation to its outcome under the given policy.
///
/// Success carries the result payload: trimmed stdout for policies that
/// require stdout, raw stdout otherwise.
pub fn resolve_outcome(output: ScriptOutput, policy: StreamPolicy) -> Result<String, ScriptFailure> {
    let failed = !output.is_success() || (policy.strict_stderr && !output.stderr.is_empty());
    if failed {
        let message = if output.stderr.is_empty() {
            format!("Python script exited with code {}", output.exit_code)
        } else {
            output.stderr
        };
        return Err(ScriptFailure {
            message,
            captured_stdout: output.stdout,
        });
    }

    if policy.require_stdout {
        let trimmed = output.stdout.trim();
        if trimmed.is_empty() {
            return Err(ScriptFailure {
                message: "Python script produced no output".to_string(),
                captured_stdout: String::new(),
            });
        }
        return Ok(trimmed.to_string());
    }

    Ok(output.stdout)
}

// Re-exports
pub use interpreter::{SystemProbe, VersionProbe, INTERPRETER_CANDIDATES};
pub use runner::{run_script, BridgeError};
