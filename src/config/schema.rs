//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from settings files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Environment variable selecting the run mode when the file does not.
pub const RUN_MODE_ENV: &str = "BASEMENT_ENV";

/// Root settings handed to the orchestrator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Deadline for a graceful stop, in milliseconds.
    pub shutdown_timeout_ms: u64,

    /// Whether fatal paths exit the process or return errors.
    #[serde(default = "RunMode::from_env")]
    pub mode: RunMode,

    /// Per-boundary settings keyed by registry name.
    #[serde(default)]
    pub boundaries: BTreeMap<String, BoundarySettings>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Application-specific keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Settings {
    /// Settings with the given shutdown deadline and defaults elsewhere.
    pub fn new(shutdown_timeout: Duration) -> Self {
        Self {
            shutdown_timeout_ms: shutdown_timeout.as_millis() as u64,
            mode: RunMode::from_env(),
            boundaries: BTreeMap::new(),
            logging: LoggingConfig::default(),
            observability: ObservabilityConfig::default(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_boundary(mut self, name: impl Into<String>, boundary: BoundarySettings) -> Self {
        self.boundaries.insert(name.into(), boundary);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn boundary(&self, name: &str) -> Option<&BoundarySettings> {
        self.boundaries.get(name)
    }

    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// String-valued application key.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra(key).and_then(serde_json::Value::as_str)
    }
}

/// Process behaviour on fatal paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Log, then terminate the process with exit code 1.
    Production,
    /// Return errors to the caller; no signal handlers, no process exit.
    Diagnostic,
}

impl RunMode {
    /// `BASEMENT_ENV=test` or `BASEMENT_ENV=diagnostic` selects diagnostic mode.
    pub fn from_env() -> Self {
        match std::env::var(RUN_MODE_ENV).as_deref() {
            Ok("test") | Ok("diagnostic") => RunMode::Diagnostic,
            _ => RunMode::Production,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        *self == RunMode::Diagnostic
    }
}

/// Settings for a single boundary.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BoundarySettings {
    /// Fixed delay between reinit attempts (auto-recovering boundaries only).
    pub reinit_delay_ms: Option<u64>,
}

impl BoundarySettings {
    pub fn with_reinit_delay(delay: Duration) -> Self {
        Self {
            reinit_delay_ms: Some(delay.as_millis() as u64),
        }
    }

    pub fn reinit_delay(&self) -> Option<Duration> {
        self.reinit_delay_ms.map(Duration::from_millis)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `LOG_LEVEL` is unset.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "trace".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
