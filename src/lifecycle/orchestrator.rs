//! Orchestrator: owns settings, logger and boundary registry.

use std::sync::Arc;
use uuid::Uuid;

use crate::boundary::Boundaries;
use crate::config::validation::validate_boundaries;
use crate::config::{validate_settings, RunMode, Settings};
use crate::error::{Error, Result};
use crate::lifecycle::process;
use crate::lifecycle::sequence::Application;
use crate::lifecycle::shutdown::{Shutdown, StopOutcome};
use crate::observability::{Logger, TracingLogger};

/// Top-level owner sequencing boundary startup and shutdown.
///
/// Cheap to clone; clones share the same registry and shutdown state.
pub struct Orchestrator<A> {
    inner: Arc<Inner<A>>,
}

struct Inner<A> {
    settings: Settings,
    boundaries: Boundaries,
    app: A,
    logger: Arc<dyn Logger>,
    shutdown: Shutdown,
    run_id: Uuid,
}

impl<A> Clone for Orchestrator<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Application> Orchestrator<A> {
    /// Validate the arguments and build an orchestrator.
    ///
    /// Without a custom logger, protocol messages go to [`TracingLogger`].
    /// The logger is fixed here; process handlers installed by `start()`
    /// receive this same reference.
    pub fn new(
        settings: Settings,
        boundaries: Boundaries,
        app: A,
        logger: Option<Arc<dyn Logger>>,
    ) -> Result<Self> {
        let mut errors = Vec::new();
        if let Err(found) = validate_settings(&settings) {
            errors.extend(found);
        }
        if let Err(found) = validate_boundaries(&boundaries, app.boundary_names()) {
            errors.extend(found);
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let run_id = Uuid::new_v4();
        tracing::debug!(
            run_id = %run_id,
            boundaries = ?boundaries.names().collect::<Vec<_>>(),
            mode = ?settings.mode,
            "Orchestrator created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                settings,
                boundaries,
                app,
                logger: logger.unwrap_or_else(|| Arc::new(TracingLogger) as Arc<dyn Logger>),
                shutdown: Shutdown::new(),
                run_id,
            }),
        })
    }
}

impl<A> Orchestrator<A> {
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.inner.boundaries
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.inner.logger
    }

    pub fn app(&self) -> &A {
        &self.inner.app
    }

    pub fn mode(&self) -> RunMode {
        self.inner.settings.mode
    }

    /// Identifier attached to this orchestrator's tracing span.
    pub fn run_id(&self) -> Uuid {
        self.inner.run_id
    }

    /// Resolves with the outcome once a `stop()` has finished.
    pub async fn wait_stopped(&self) -> StopOutcome {
        self.inner.shutdown.wait().await
    }

    pub(crate) fn shutdown(&self) -> &Shutdown {
        &self.inner.shutdown
    }

    pub(crate) fn span(&self) -> tracing::Span {
        tracing::info_span!("orchestrator", run_id = %self.inner.run_id)
    }

    /// Terminate with exit code 1 in production; hand the error back otherwise.
    ///
    /// The caller has already logged the failure.
    pub(crate) fn exit_or_return(&self, error: Error) -> Error {
        if self.mode().is_diagnostic() {
            return error;
        }
        process::terminate(&**self.logger(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{Boundary, BoxError, Resource};
    use crate::config::ValidationError;
    use crate::lifecycle::StagedSequence;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Noop;

    #[async_trait]
    impl Resource for Noop {
        async fn init_sequence(&self) -> std::result::Result<(), BoxError> {
            Ok(())
        }

        async fn close_sequence(&self) -> std::result::Result<(), BoxError> {
            Ok(())
        }
    }

    fn settings() -> Settings {
        Settings::new(Duration::from_secs(1)).with_mode(RunMode::Diagnostic)
    }

    #[test]
    fn test_valid_construction() {
        let boundaries = Boundaries::new().with("db", Boundary::new("db", Noop));
        let orchestrator =
            Orchestrator::new(settings(), boundaries, StagedSequence::new().then("db"), None).unwrap();

        assert_eq!(orchestrator.boundaries().len(), 1);
        assert_eq!(orchestrator.mode(), RunMode::Diagnostic);
    }

    #[test]
    fn test_empty_boundaries_rejected() {
        let err = Orchestrator::new(settings(), Boundaries::new(), StagedSequence::new(), None)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Validation(errors) if errors == vec![ValidationError::NoBoundaries]));
    }

    #[test]
    fn test_sequence_naming_unknown_boundary_rejected() {
        let boundaries = Boundaries::new().with("db", Boundary::new("db", Noop));
        let err = Orchestrator::new(
            settings(),
            boundaries,
            StagedSequence::new().then("db").then("queue"),
            None,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            Error::Validation(errors) if errors == vec![ValidationError::UnknownBoundary("queue".into())]
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let boundaries = Boundaries::new().with("db", Boundary::new("db", Noop));
        let settings = Settings::new(Duration::ZERO).with_mode(RunMode::Diagnostic);
        let err = Orchestrator::new(settings, boundaries, StagedSequence::new(), None)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Validation(errors) if errors == vec![ValidationError::ZeroShutdownTimeout]));
    }
}
