//! Auto-recovering boundary: failed initialization is retried on a fixed delay.
//!
//! # Responsibilities
//! - Absorb init failures into `WaitingReinit` instead of returning them
//! - Own the single pending reinit timer and cancel it on close
//! - Retry indefinitely at a constant delay until init succeeds or close is called
//!
//! # Design Decisions
//! - No backoff growth and no retry ceiling
//! - The timer is a tokio task tagged with a generation number; close bumps the
//!   generation so a timer that already woke up cannot re-open the boundary
//! - Missing reinit delay is reported at the first failure, not at construction

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::boundary::error::{BoundaryError, BoxError, Operation};
use crate::boundary::state::Status;
use crate::boundary::{Lifecycle, Resource};
use crate::config::BoundarySettings;
use crate::observability::metrics;

/// A boundary that keeps retrying initialization until it opens.
pub struct AutoRecoveringBoundary<R> {
    shared: Arc<Shared<R>>,
}

struct Shared<R> {
    name: String,
    resource: R,
    reinit_delay: Option<Duration>,
    attempts: AtomicU64,
    state: Mutex<State>,
}

/// Status and pending timer change together under one lock, which keeps
/// `pending.is_some()` equivalent to `status == WaitingReinit`.
struct State {
    status: Status,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl State {
    /// Invalidate and abort the outstanding timer, if any.
    fn cancel_pending(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<R: Resource> AutoRecoveringBoundary<R> {
    /// Create a boundary retrying every `reinit_delay`.
    ///
    /// `None` is accepted here; the first failed init then returns
    /// [`BoundaryError::Configuration`].
    pub fn new(name: impl Into<String>, resource: R, reinit_delay: Option<Duration>) -> Self {
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                resource,
                reinit_delay,
                attempts: AtomicU64::new(0),
                state: Mutex::new(State {
                    status: Status::Closed,
                    generation: 0,
                    pending: None,
                }),
            }),
        }
    }

    /// Create a boundary using the reinit delay from its settings entry.
    pub fn from_settings(
        name: impl Into<String>,
        resource: R,
        settings: Option<&BoundarySettings>,
    ) -> Self {
        Self::new(name, resource, settings.and_then(BoundarySettings::reinit_delay))
    }

    pub fn resource(&self) -> &R {
        &self.shared.resource
    }

    pub fn reinit_delay(&self) -> Option<Duration> {
        self.shared.reinit_delay
    }

    /// Number of times the init sequence has been invoked.
    pub fn attempts(&self) -> u64 {
        self.shared.attempts.load(Ordering::SeqCst)
    }
}

impl<R: Resource> Shared<R> {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, state: &mut State, status: Status) {
        state.status = status;
        metrics::record_transition(&self.name, status);
    }

    async fn attempt(self: &Arc<Self>) -> Result<(), BoundaryError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(boundary = %self.name, attempt, "Initializing boundary");

        match self.resource.init_sequence().await {
            Ok(()) => {
                let mut state = self.lock();
                self.set(&mut state, Status::Opened);
                tracing::info!(boundary = %self.name, attempt, "Boundary opened");
                Ok(())
            }
            Err(error) => self.schedule_reinit(error),
        }
    }

    fn schedule_reinit(self: &Arc<Self>, error: BoxError) -> Result<(), BoundaryError> {
        let mut state = self.lock();
        let Some(delay) = self.reinit_delay else {
            self.set(&mut state, Status::Closed);
            tracing::error!(boundary = %self.name, error = %error, "Boundary init failed and no reinit delay is configured");
            return Err(BoundaryError::Configuration {
                name: self.name.clone(),
            });
        };

        tracing::warn!(
            boundary = %self.name,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "Boundary init failed, waiting before reinit"
        );
        state.cancel_pending();
        let generation = state.generation;
        self.set(&mut state, Status::WaitingReinit);
        state.pending = Some(self.arm(delay, generation));
        Ok(())
    }

    fn arm(self: &Arc<Self>, delay: Duration, generation: u64) -> JoinHandle<()> {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.fire(generation).await;
        })
    }

    async fn fire(self: &Arc<Self>, generation: u64) {
        {
            let mut state = self.lock();
            if state.generation != generation || state.status != Status::WaitingReinit {
                return;
            }
            // Our own handle: drop it without aborting the running task.
            state.pending = None;
            self.set(&mut state, Status::Initializing);
        }
        metrics::record_reinit(&self.name);

        if let Err(error) = self.attempt().await {
            tracing::error!(boundary = %self.name, error = %error, "Boundary reinit failed");
        }
    }
}

#[async_trait]
impl<R: Resource> Lifecycle for AutoRecoveringBoundary<R> {
    fn name(&self) -> &str {
        &self.shared.name
    }

    fn status(&self) -> Status {
        self.shared.lock().status
    }

    async fn init(&self) -> Result<(), BoundaryError> {
        {
            let mut state = self.shared.lock();
            match state.status {
                Status::Closed => {}
                // Explicit retry: replaces the pending timer.
                Status::WaitingReinit => state.cancel_pending(),
                status => {
                    return Err(BoundaryError::lifecycle(&self.shared.name, Operation::Init, status));
                }
            }
            self.shared.set(&mut state, Status::Initializing);
        }
        self.shared.attempt().await
    }

    async fn close(&self) -> Result<(), BoundaryError> {
        {
            let mut state = self.shared.lock();
            match state.status {
                Status::Closed => return Ok(()),
                Status::WaitingReinit => {
                    // Never opened, so there is nothing for the close hook to release.
                    state.cancel_pending();
                    self.shared.set(&mut state, Status::Closed);
                    tracing::info!(boundary = %self.shared.name, "Pending reinit cancelled");
                    return Ok(());
                }
                Status::Opened => self.shared.set(&mut state, Status::Closing),
                status => {
                    return Err(BoundaryError::lifecycle(&self.shared.name, Operation::Close, status));
                }
            }
        }

        match self.shared.resource.close_sequence().await {
            Ok(()) => {
                let mut state = self.shared.lock();
                self.shared.set(&mut state, Status::Closed);
                tracing::info!(boundary = %self.shared.name, "Boundary closed");
                Ok(())
            }
            Err(source) => {
                let mut state = self.shared.lock();
                self.shared.set(&mut state, Status::Opened);
                tracing::warn!(boundary = %self.shared.name, error = %source, "Boundary close failed");
                Err(BoundaryError::Close {
                    name: self.shared.name.clone(),
                    source,
                })
            }
        }
    }
}

impl<R> Drop for AutoRecoveringBoundary<R> {
    fn drop(&mut self) {
        // The timer task holds its own Arc; stop it so the resource can be released.
        let mut state = self.shared.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.cancel_pending();
    }
}
