//! Application configuration
//!
//! Every deployment knob is read once at startup into an explicit struct
//! that handlers receive through router state. Nothing reads the process
//! environment after boot.

use std::path::PathBuf;
use std::time::Duration;

use crate::bridge::{StreamPolicy, DEFAULT_SCRIPT_TIMEOUT_SECS};

/// Server configuration, built once in `main`
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port
    pub port: u16,
    /// News provider API key
    pub news_api_key: String,
    /// News provider endpoint
    pub news_base_url: String,
    /// Directory holding the quiz and chatbot scripts
    pub scripts_dir: PathBuf,
    /// Directory of static pages
    pub public_dir: PathBuf,
    /// Pinned interpreter command; `None` means probe PATH per request
    pub interpreter_override: Option<String>,
    /// Wall-clock limit per script invocation
    pub script_timeout: Duration,
    /// Outcome rules for the quiz scorer
    pub quiz_policy: StreamPolicy,
    /// Outcome rules for the chatbot
    pub chat_policy: StreamPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            news_api_key: "YOUR_AV_API_KEY_HERE".to_string(),
            news_base_url: "https://www.alphavantage.co/query".to_string(),
            scripts_dir: PathBuf::from("scripts"),
            public_dir: PathBuf::from("public"),
            interpreter_override: None,
            script_timeout: Duration::from_secs(DEFAULT_SCRIPT_TIMEOUT_SECS),
            quiz_policy: StreamPolicy::quiz(),
            chat_policy: StreamPolicy::chat(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults.
    /// Call after `dotenvy::dotenv()` so `.env` entries are visible.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.port),
            news_api_key: std::env::var("ALPHAVANTAGE_KEY").unwrap_or(base.news_api_key),
            news_base_url: std::env::var("NEWS_API_BASE").unwrap_or(base.news_base_url),
            scripts_dir: std::env::var("SCRIPTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(base.scripts_dir),
            public_dir: std::env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(base.public_dir),
            interpreter_override: std::env::var("PYTHON_BIN").ok().filter(|v| !v.is_empty()),
            script_timeout: std::env::var("SCRIPT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(base.script_timeout),
            quiz_policy: base.quiz_policy,
            chat_policy: base.chat_policy,
        }
    }

    /// Path to the quiz scorer script
    pub fn quiz_script(&self) -> PathBuf {
        self.scripts_dir.join("quiz.py")
    }

    /// Path to the chatbot script
    pub fn chat_script(&self) -> PathBuf {
        self.scripts_dir.join("chatbot.py")
    }
}
