//! Application-supplied start/stop sequences.
//!
//! # Responsibilities
//! - Define the hooks an application implements to order boundary operations
//! - Provide `StagedSequence`, an ordered list of stages ready to use
//!
//! # Design Decisions
//! - Stages run in declaration order on start and in reverse on stop
//! - Boundaries inside one stage are driven concurrently
//! - Every boundary in a stage is allowed to settle before an error is
//!   reported, so none is abandoned mid-transition

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::boundary::{Boundaries, BoundaryError, BoxError};

/// Ordered boundary operations for one application.
#[async_trait]
pub trait Application: Send + Sync + 'static {
    /// Open boundaries in the order the application requires.
    async fn start_sequence(&self, boundaries: &Boundaries) -> Result<(), BoxError>;

    /// Close boundaries, typically in reverse startup order.
    async fn stop_sequence(&self, boundaries: &Boundaries) -> Result<(), BoxError>;

    /// Registry names the sequences refer to; checked at construction.
    fn boundary_names(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Stage-by-stage startup with mirrored shutdown.
#[derive(Debug, Clone, Default)]
pub struct StagedSequence {
    stages: Vec<Vec<String>>,
}

impl StagedSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage holding a single boundary.
    pub fn then(self, key: impl Into<String>) -> Self {
        self.stage([key])
    }

    /// Append a stage whose boundaries are initialized concurrently.
    pub fn stage<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stage: Vec<String> = keys.into_iter().map(Into::into).collect();
        if !stage.is_empty() {
            self.stages.push(stage);
        }
        self
    }

    pub fn stages(&self) -> &[Vec<String>] {
        &self.stages
    }
}

fn first_error(results: Vec<Result<(), BoundaryError>>) -> Option<BoundaryError> {
    let mut first = None;
    for error in results.into_iter().filter_map(Result::err) {
        tracing::warn!(error = %error, "Boundary operation failed");
        first.get_or_insert(error);
    }
    first
}

#[async_trait]
impl Application for StagedSequence {
    async fn start_sequence(&self, boundaries: &Boundaries) -> Result<(), BoxError> {
        for (index, stage) in self.stages.iter().enumerate() {
            tracing::debug!(stage = index, boundaries = ?stage, "Starting stage");
            let results = join_all(stage.iter().map(|key| boundaries.init(key))).await;
            if let Some(error) = first_error(results) {
                return Err(error.into());
            }
        }
        Ok(())
    }

    async fn stop_sequence(&self, boundaries: &Boundaries) -> Result<(), BoxError> {
        // Keep closing later stages even if one fails; report the first failure.
        let mut failure = None;
        for (index, stage) in self.stages.iter().enumerate().rev() {
            tracing::debug!(stage = index, boundaries = ?stage, "Stopping stage");
            let results = join_all(stage.iter().map(|key| boundaries.close(key))).await;
            if let Some(error) = first_error(results) {
                failure.get_or_insert(error);
            }
        }
        match failure {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    fn boundary_names(&self) -> Vec<&str> {
        self.stages.iter().flatten().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{Boundary, Lifecycle, Resource};
    use std::sync::{Arc, Mutex};

    /// Appends "<name>:init" / "<name>:close" to a shared journal.
    struct Journaled {
        name: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
        fail_init: bool,
    }

    #[async_trait]
    impl Resource for Journaled {
        async fn init_sequence(&self) -> Result<(), BoxError> {
            self.journal.lock().unwrap().push(format!("{}:init", self.name));
            if self.fail_init {
                return Err("refused".into());
            }
            Ok(())
        }

        async fn close_sequence(&self) -> Result<(), BoxError> {
            self.journal.lock().unwrap().push(format!("{}:close", self.name));
            Ok(())
        }
    }

    fn registry(journal: &Arc<Mutex<Vec<String>>>, failing: Option<&str>) -> Boundaries {
        ["db", "queue", "http"]
            .into_iter()
            .fold(Boundaries::new(), |boundaries, name| {
                boundaries.with(
                    name,
                    Boundary::new(
                        name,
                        Journaled {
                            name,
                            journal: journal.clone(),
                            fail_init: failing == Some(name),
                        },
                    ),
                )
            })
    }

    #[tokio::test]
    async fn test_stages_start_in_order_and_stop_in_reverse() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let boundaries = registry(&journal, None);
        let sequence = StagedSequence::new().then("db").then("queue").then("http");

        sequence.start_sequence(&boundaries).await.unwrap();
        sequence.stop_sequence(&boundaries).await.unwrap();

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["db:init", "queue:init", "http:init", "http:close", "queue:close", "db:close"]
        );
        assert!(boundaries.unclosed().is_empty());
    }

    #[tokio::test]
    async fn test_failed_stage_stops_startup() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let boundaries = registry(&journal, Some("queue"));
        let sequence = StagedSequence::new().then("db").then("queue").then("http");

        let err = sequence.start_sequence(&boundaries).await.unwrap_err();
        assert!(err.to_string().contains("queue failed to initialize"));
        assert!(boundaries.require("db").unwrap().is_opened());
        assert!(boundaries.require("http").unwrap().is_closed());

        // Best-effort stop closes what did open.
        sequence.stop_sequence(&boundaries).await.unwrap();
        assert!(boundaries.unclosed().is_empty());
    }

    #[test]
    fn test_boundary_names_flatten_stages() {
        let sequence = StagedSequence::new()
            .then("db")
            .stage(["queue", "cache"])
            .stage(Vec::<String>::new());
        assert_eq!(sequence.boundary_names(), vec!["db", "queue", "cache"]);
        assert_eq!(sequence.stages().len(), 2);
    }
}
