//! Script runner
//!
//! Spawns the interpreter on a target script, writes the request payload as
//! one JSON line to stdin, closes stdin, and collects both output streams
//! until the child exits or the deadline expires.

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ScriptJob, ScriptOutput};

/// Errors raised before a script produces a resolvable result
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The child process never started
    #[error("Failed to start Python process: {0}")]
    Spawn(#[source] std::io::Error),
    /// The child started but its result could not be collected
    #[error("Failed to collect script output: {0}")]
    Wait(#[source] std::io::Error),
    /// The deadline expired and the child was killed
    #[error("Python script timed out after {} seconds", .limit.as_secs())]
    TimedOut { limit: Duration },
}

/// Run one script invocation to completion.
///
/// The deadline bounds the whole exchange, the stdin feed included: a child
/// that never reads its stdin cannot hold the request open past the timeout.
/// A script that exits before reading its stdin still resolves by exit
/// status: a failed stdin write is logged, not propagated.
pub async fn run_script(job: &ScriptJob) -> Result<ScriptOutput, BridgeError> {
    debug!(
        "Running script: {:?} via {} (timeout {:?})",
        job.script, job.interpreter, job.timeout
    );

    let mut cmd = Command::new(&job.interpreter);
    cmd.arg(&job.script)
        .env("PYTHONIOENCODING", "utf-8")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(BridgeError::Spawn)?;

    // One JSON line in, then EOF. Payloads can exceed the pipe buffer, so
    // the write must live under the same deadline as the wait.
    let feed_and_wait = async {
        if let Some(mut stdin) = child.stdin.take() {
            let mut line = job.payload.clone();
            line.push('\n');
            if let Err(err) = stdin.write_all(line.as_bytes()).await {
                debug!("stdin write ended early: {}", err);
            }
        }
        child.wait_with_output().await
    };

    let output = match tokio::time::timeout(job.timeout, feed_and_wait).await {
        Ok(result) => result.map_err(BridgeError::Wait)?,
        Err(_) => {
            warn!(
                "Script {:?} exceeded {:?}, killing child",
                job.script, job.timeout
            );
            return Err(BridgeError::TimedOut { limit: job.timeout });
        }
    };

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    debug!("Script {:?} exited with code {}", job.script, exit_code);

    Ok(ScriptOutput {
        exit_code,
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn stub_script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("stub.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_writes_payload_as_one_line_and_closes_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let script = stub_script(&dir, "cat");
        let job = ScriptJob::new("sh", &script, r#"["a","b"]"#);

        let output = run_script(&job).await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "[\"a\",\"b\"]\n");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn test_captures_exit_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = stub_script(&dir, "echo oops >&2\nexit 3\n");
        let job = ScriptJob::new("sh", &script, "{}");

        let output = run_script(&job).await.unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr, "oops\n");
        assert!(!output.is_success());
    }

    #[tokio::test]
    async fn test_kills_child_on_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let script = stub_script(&dir, "sleep 5\n");
        let job =
            ScriptJob::new("sh", &script, "{}").with_timeout(Duration::from_millis(200));

        let err = run_script(&job).await.unwrap_err();
        assert!(matches!(err, BridgeError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_deadline_covers_stdin_feed() {
        let dir = tempfile::tempdir().unwrap();
        let script = stub_script(&dir, "sleep 8\n");
        // Larger than any OS pipe buffer, against a child that never reads
        let payload = "x".repeat(1024 * 1024);
        let job =
            ScriptJob::new("sh", &script, payload).with_timeout(Duration::from_millis(200));

        let result = tokio::time::timeout(Duration::from_secs(2), run_script(&job))
            .await
            .expect("invocation must resolve within its deadline");
        assert!(matches!(result.unwrap_err(), BridgeError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = stub_script(&dir, "cat");
        let job = ScriptJob::new("no-such-interpreter-4242", &script, "{}");

        let err = run_script(&job).await.unwrap_err();
        assert!(matches!(err, BridgeError::Spawn(_)));
    }

    #[tokio::test]
    async fn test_early_exit_still_resolves_by_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let script = stub_script(&dir, "exit 7\n");
        let job = ScriptJob::new("sh", &script, "{}");

        let output = run_script(&job).await.unwrap();
        assert_eq!(output.exit_code, 7);
    }
}
