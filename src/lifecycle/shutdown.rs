//! Shutdown coordination.
//!
//! # Responsibilities
//! - Guard `stop()` so concurrent triggers (repeated signals) run it once
//! - Race the stop sequence against `shutdown_timeout`
//! - Report unclosed boundaries when the deadline wins
//! - Publish the outcome of the stop to waiters and later callers

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::Instrument;

use crate::error::{Error, Result};
use crate::lifecycle::orchestrator::Orchestrator;
use crate::lifecycle::sequence::Application;
use crate::observability::metrics;

/// How the single stop of an orchestrator ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    /// The stop failed or hit the deadline; holds the error message.
    Failed(String),
}

impl StopOutcome {
    fn from_result(result: &Result<()>) -> Self {
        match result {
            Ok(()) => StopOutcome::Stopped,
            Err(error) => StopOutcome::Failed(error.to_string()),
        }
    }

    fn into_result(self) -> Result<()> {
        match self {
            StopOutcome::Stopped => Ok(()),
            StopOutcome::Failed(message) => Err(Error::StopFailed(message)),
        }
    }
}

/// Coordinator for a single shutdown.
///
/// The first caller of [`Shutdown::begin`] owns the shutdown and publishes
/// its outcome through [`Shutdown::complete`]; waiters see it whenever they
/// subscribe.
#[derive(Debug)]
pub struct Shutdown {
    started: AtomicBool,
    tx: watch::Sender<Option<StopOutcome>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            started: AtomicBool::new(false),
            tx,
        }
    }

    /// Claim the shutdown. Only the first call returns `true`.
    pub fn begin(&self) -> bool {
        !self.started.swap(true, Ordering::AcqRel)
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Record the outcome and release all waiters.
    pub fn complete(&self, outcome: StopOutcome) {
        self.tx.send_replace(Some(outcome));
    }

    pub fn is_complete(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Outcome of the finished shutdown, if any.
    pub fn outcome(&self) -> Option<StopOutcome> {
        self.tx.borrow().clone()
    }

    /// Subscribe to completion.
    pub fn subscribe(&self) -> watch::Receiver<Option<StopOutcome>> {
        self.tx.subscribe()
    }

    /// Wait until [`Shutdown::complete`] has been called.
    pub async fn wait(&self) -> StopOutcome {
        let mut rx = self.subscribe();
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone(),
            // The sender lives as long as `self`, so this cannot fail while borrowed.
            Err(_) => None,
        };
        outcome.unwrap_or(StopOutcome::Stopped)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Application> Orchestrator<A> {
    /// Run the stop sequence under the shutdown deadline.
    ///
    /// Only the first call runs the stop sequence. Later calls wait for it and
    /// return its outcome; a failed first stop yields [`Error::StopFailed`].
    /// In production mode failures and timeouts exit the process with code 1;
    /// `Err` is only returned in diagnostic mode.
    pub async fn stop(&self) -> Result<()> {
        self.stop_inner().instrument(self.span()).await
    }

    async fn stop_inner(&self) -> Result<()> {
        let logger = self.logger();
        if !self.shutdown().begin() {
            logger.trace("Stop already requested, waiting for its outcome");
            return self.shutdown().wait().await.into_result();
        }
        logger.info("Stopping...");

        let deadline = self.settings().shutdown_timeout();
        let sequence = self.app().stop_sequence(self.boundaries());
        let result = match tokio::time::timeout(deadline, sequence).await {
            Ok(Ok(())) => {
                logger.info("Stopped");
                Ok(())
            }
            Ok(Err(source)) => {
                let error = Error::Shutdown(source);
                logger.error(&error.to_string());
                Err(self.exit_or_return(error))
            }
            Err(_) => {
                // The stop sequence future is dropped here, so nothing after
                // the deadline runs on its behalf.
                let unclosed = self.boundaries().unclosed();
                metrics::record_forced_shutdown();
                logger.error(&format!(
                    "Stopped forcefully, unclosed boundaries: {}",
                    unclosed.join(", ")
                ));
                Err(self.exit_or_return(Error::ShutdownTimeout {
                    unclosed,
                    timeout_ms: self.settings().shutdown_timeout_ms,
                }))
            }
        };

        self.shutdown().complete(StopOutcome::from_result(&result));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_claimed_once() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_started());
        assert!(shutdown.begin());
        assert!(!shutdown.begin());
        assert!(shutdown.is_started());
    }

    #[tokio::test]
    async fn test_wait_returns_outcome_even_for_late_waiters() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.outcome(), None);
        shutdown.complete(StopOutcome::Failed("db failed to close".into()));
        assert!(shutdown.is_complete());
        assert_eq!(
            shutdown.wait().await,
            StopOutcome::Failed("db failed to close".into())
        );
    }

    #[test]
    fn test_failed_outcome_becomes_stop_failed_error() {
        let err = StopOutcome::Failed("boom".into()).into_result().unwrap_err();
        assert!(matches!(err, Error::StopFailed(ref message) if message == "boom"));
        assert!(StopOutcome::Stopped.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_wait_released_by_complete() {
        let shutdown = std::sync::Arc::new(Shutdown::new());
        let waiter = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.wait().await })
        };
        tokio::task::yield_now().await;
        shutdown.complete(StopOutcome::Stopped);
        assert_eq!(waiter.await.unwrap(), StopOutcome::Stopped);
    }
}
