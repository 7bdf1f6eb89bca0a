//! Boundary error definitions.

use std::fmt;
use thiserror::Error;

use crate::boundary::state::Status;

/// Error type produced by resource hooks and application sequences.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Boundary operation named in lifecycle errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    Close,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Init => f.write_str("init"),
            Operation::Close => f.write_str("close"),
        }
    }
}

/// Errors that can occur while driving a boundary.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// Operation attempted while the boundary was in an incompatible state.
    #[error("{name}.{operation} can't be started, status is {status}")]
    Lifecycle {
        name: String,
        operation: Operation,
        status: Status,
    },

    /// Auto-recovering boundary failed without a reinit delay to retry on.
    #[error("{name} must have a reinit delay configured")]
    Configuration { name: String },

    /// The resource's init sequence failed.
    #[error("{name} failed to initialize: {source}")]
    Init {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The resource's close sequence failed.
    #[error("{name} failed to close: {source}")]
    Close {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Lookup of a name that is not in the registry.
    #[error("unknown boundary '{0}'")]
    Unknown(String),
}

impl BoundaryError {
    pub(crate) fn lifecycle(name: &str, operation: Operation, status: Status) -> Self {
        BoundaryError::Lifecycle {
            name: name.to_string(),
            operation,
            status,
        }
    }

    /// True for state-precondition failures.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, BoundaryError::Lifecycle { .. })
    }

    /// The error returned by the resource hook, if this wraps one.
    pub fn resource_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            BoundaryError::Init { source, .. } | BoundaryError::Close { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}
