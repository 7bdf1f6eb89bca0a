//! Structured logging.
//!
//! # Responsibilities
//! - Define the leveled `Logger` capability the orchestrator writes through
//! - Provide the default `TracingLogger` sink
//! - Initialize the `tracing` subscriber for binaries

use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Environment variable overriding the configured filter.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Leveled logging sink.
pub trait Logger: Send + Sync {
    fn trace(&self, message: &str);

    fn debug(&self, message: &str) {
        self.trace(message);
    }

    fn info(&self, message: &str);

    fn warn(&self, message: &str) {
        self.info(message);
    }

    fn error(&self, message: &str);

    /// Unrecoverable condition; the caller terminates the process afterwards.
    fn fatal(&self, message: &str);
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn trace(&self, message: &str) {
        (**self).trace(message);
    }

    fn debug(&self, message: &str) {
        (**self).debug(message);
    }

    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }

    fn fatal(&self, message: &str) {
        (**self).fatal(message);
    }
}

/// Default sink: forwards every call to `tracing`.
///
/// `tracing` has no fatal level, so fatal lines are emitted at error level
/// with `fatal = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn trace(&self, message: &str) {
        tracing::trace!("{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn fatal(&self, message: &str) {
        tracing::error!(fatal = true, "{message}");
    }
}

/// Install the global `tracing` subscriber.
///
/// `LOG_LEVEL` takes precedence over `config.level`. Fails if a subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let writer = std::io::stderr
        .with_max_level(Level::ERROR)
        .or_else(std::io::stdout);

    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init(),
    }
}
