//! Startup orchestration.
//!
//! # Responsibilities
//! - Announce startup through the injected logger
//! - Install process handlers before any boundary opens (production only)
//! - Run the application's start sequence
//!
//! # Design Decisions
//! - Fail fast: a start sequence error is fatal in production
//! - Diagnostic mode returns the error so a harness can assert on it

use std::sync::Arc;
use tracing::Instrument;

use crate::error::{Error, Result};
use crate::lifecycle::orchestrator::Orchestrator;
use crate::lifecycle::sequence::Application;
use crate::lifecycle::{process, signals};

impl<A: Application> Orchestrator<A> {
    /// Run the start sequence.
    ///
    /// In production mode a failure is logged at fatal level and the process
    /// exits with code 1; this method only returns `Err` in diagnostic mode.
    pub async fn start(&self) -> Result<()> {
        self.start_inner().instrument(self.span()).await
    }

    async fn start_inner(&self) -> Result<()> {
        let logger = self.logger();
        logger.info("Starting...");

        if !self.mode().is_diagnostic() {
            process::install_panic_hook(Arc::clone(logger));
            if let Err(error) = signals::spawn_signal_listener(self.clone()) {
                let error = Error::Signal(error);
                logger.fatal(&error.to_string());
                return Err(self.exit_or_return(error));
            }
        }

        match self.app().start_sequence(self.boundaries()).await {
            Ok(()) => {
                logger.info("Started");
                Ok(())
            }
            Err(source) => {
                let error = Error::Startup(source);
                if self.mode().is_diagnostic() {
                    logger.error(&error.to_string());
                } else {
                    logger.fatal(&error.to_string());
                }
                Err(self.exit_or_return(error))
            }
        }
    }
}
