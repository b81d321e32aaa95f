//! Interpreter discovery
//!
//! Locates a usable Python executable by probing conventional command names
//! in order. Absence is a value, not an error: callers convert it into a
//! user-facing configuration message instead of crashing.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Candidate interpreter commands, probed in order
pub const INTERPRETER_CANDIDATES: &[&str] = &["python", "python3", "py"];

/// Probe seam for checking whether a command answers a version query
#[async_trait]
pub trait VersionProbe: Send + Sync {
    /// True when `cmd --version` runs and exits successfully
    async fn check(&self, cmd: &str) -> bool;
}

/// Probe that executes `cmd --version` with all three streams suppressed
pub struct SystemProbe;

#[async_trait]
impl VersionProbe for SystemProbe {
    async fn check(&self, cmd: &str) -> bool {
        Command::new(cmd)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// Return the first candidate the probe accepts, or `None` when every
/// candidate fails. A candidate that exists but cannot be executed counts
/// as failed, same as one that is missing entirely.
pub async fn resolve_with(probe: &dyn VersionProbe, candidates: &[&str]) -> Option<String> {
    for cmd in candidates {
        if probe.check(cmd).await {
            debug!("Resolved interpreter: {}", cmd);
            return Some((*cmd).to_string());
        }
        debug!("Interpreter candidate failed version probe: {}", cmd);
    }
    None
}
