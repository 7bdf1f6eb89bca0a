//! Base boundary: init/close lifecycle with fail-fast initialization.

use async_trait::async_trait;

use crate::boundary::error::{BoundaryError, Operation};
use crate::boundary::state::{Status, StatusCell};
use crate::boundary::{Lifecycle, Resource};
use crate::observability::metrics;

/// A boundary whose failed initialization is reported to the caller.
///
/// On init failure the status reverts to `Closed` and the resource error is
/// returned; retrying is the caller's decision.
#[derive(Debug)]
pub struct Boundary<R> {
    name: String,
    resource: R,
    status: StatusCell,
}

impl<R: Resource> Boundary<R> {
    pub fn new(name: impl Into<String>, resource: R) -> Self {
        Self {
            name: name.into(),
            resource,
            status: StatusCell::new(),
        }
    }

    /// Access the wrapped resource.
    pub fn resource(&self) -> &R {
        &self.resource
    }

    fn set(&self, status: Status) {
        self.status.store(status);
        metrics::record_transition(&self.name, status);
    }
}

#[async_trait]
impl<R: Resource> Lifecycle for Boundary<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> Status {
        self.status.load()
    }

    async fn init(&self) -> Result<(), BoundaryError> {
        self.status
            .transition(Status::Closed, Status::Initializing)
            .map_err(|status| BoundaryError::lifecycle(&self.name, Operation::Init, status))?;
        metrics::record_transition(&self.name, Status::Initializing);
        tracing::debug!(boundary = %self.name, "Initializing boundary");

        match self.resource.init_sequence().await {
            Ok(()) => {
                self.set(Status::Opened);
                tracing::info!(boundary = %self.name, "Boundary opened");
                Ok(())
            }
            Err(source) => {
                self.set(Status::Closed);
                tracing::warn!(boundary = %self.name, error = %source, "Boundary init failed");
                Err(BoundaryError::Init {
                    name: self.name.clone(),
                    source,
                })
            }
        }
    }

    async fn close(&self) -> Result<(), BoundaryError> {
        match self.status.transition(Status::Opened, Status::Closing) {
            Ok(()) => {}
            // Closing an already-closed boundary is a no-op.
            Err(Status::Closed) => return Ok(()),
            Err(status) => {
                return Err(BoundaryError::lifecycle(&self.name, Operation::Close, status));
            }
        }
        metrics::record_transition(&self.name, Status::Closing);
        tracing::debug!(boundary = %self.name, "Closing boundary");

        match self.resource.close_sequence().await {
            Ok(()) => {
                self.set(Status::Closed);
                tracing::info!(boundary = %self.name, "Boundary closed");
                Ok(())
            }
            Err(source) => {
                self.set(Status::Opened);
                tracing::warn!(boundary = %self.name, error = %source, "Boundary close failed");
                Err(BoundaryError::Close {
                    name: self.name.clone(),
                    source,
                })
            }
        }
    }
}
