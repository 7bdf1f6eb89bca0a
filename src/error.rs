//! Crate-level error taxonomy.

use thiserror::Error;

use crate::boundary::{BoundaryError, BoxError};
use crate::config::validation::format_errors;
use crate::config::{ConfigError, ValidationError};

/// Errors surfaced by the orchestrator.
///
/// In production mode the fatal variants are logged and the process exits
/// instead; they are only returned in diagnostic mode.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed constructor arguments.
    #[error("invalid orchestrator arguments: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),

    /// A boundary operation failed outside a sequence.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// The start sequence failed.
    #[error("error during startup: {0}")]
    Startup(#[source] BoxError),

    /// The stop sequence failed.
    #[error("error during shutdown: {0}")]
    Shutdown(#[source] BoxError),

    /// The stop sequence did not finish before the shutdown deadline.
    #[error("shutdown timed out after {timeout_ms}ms, unclosed boundaries: {}", .unclosed.join(", "))]
    ShutdownTimeout {
        unclosed: Vec<String>,
        timeout_ms: u64,
    },

    /// `stop()` was called again after the first stop failed.
    #[error("an earlier stop did not complete: {0}")]
    StopFailed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Signal handlers could not be installed.
    #[error("failed to install signal handlers: {0}")]
    Signal(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::Validation(errors)
    }
}
