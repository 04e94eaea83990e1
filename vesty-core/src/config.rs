//! Runtime configuration.
//!
//! Everything has a default, so an empty JSON object (or no file at all)
//! yields a working console. Durations are written in milliseconds.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BANNER: &str = "VestyWinBox Terminal v1.0.0 - Ready";
pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_LATENCY_MS: u64 = 1000;
pub const DEFAULT_NOTIFICATION_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub console: ConsoleConfig,
    pub notifications: NotificationConfig,
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

/// What happens to a result that arrives after `clear()` wiped its echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateResultPolicy {
    /// Drop it. The transcript only holds results whose echo is still shown.
    #[default]
    Discard,
    /// Append it after the banner anyway.
    Append,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub banner: String,
    pub prompt: String,
    /// Simulated execution time before a result is recorded.
    pub latency_ms: u64,
    /// Normalized inputs that reset the screen instead of printing a result.
    pub clear_tokens: Vec<String>,
    pub late_result: LateResultPolicy,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            banner: DEFAULT_BANNER.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            latency_ms: DEFAULT_LATENCY_MS,
            clear_tokens: vec!["cls".to_string(), "clear".to_string()],
            late_result: LateResultPolicy::Discard,
        }
    }
}

impl ConsoleConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub default_duration_ms: u64,
    /// `None` keeps every notification; `Some(n)` drops the oldest past `n`.
    pub max_visible: Option<usize>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_NOTIFICATION_MS,
            max_visible: None,
        }
    }
}

impl NotificationConfig {
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }
}
