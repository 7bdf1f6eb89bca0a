//! Named boundary registry owned by the orchestrator.

use std::fmt;
use std::sync::Arc;

use crate::boundary::error::BoundaryError;
use crate::boundary::state::Status;
use crate::boundary::Lifecycle;

/// Ordered mapping from registry name to boundary instance.
///
/// Registration order is kept so reports list boundaries the way the
/// application declared them.
#[derive(Clone, Default)]
pub struct Boundaries {
    entries: Vec<(String, Arc<dyn Lifecycle>)>,
}

impl Boundaries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a boundary under `key`, replacing any previous entry.
    pub fn with<B: Lifecycle + 'static>(self, key: impl Into<String>, boundary: B) -> Self {
        self.with_shared(key, Arc::new(boundary))
    }

    /// Register a boundary the caller keeps a handle to.
    pub fn with_shared(mut self, key: impl Into<String>, boundary: Arc<dyn Lifecycle>) -> Self {
        self.insert(key, boundary);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, boundary: Arc<dyn Lifecycle>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some(entry) => entry.1 = boundary,
            None => self.entries.push((key, boundary)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn Lifecycle>> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, boundary)| boundary)
    }

    /// Like [`Boundaries::get`], failing with [`BoundaryError::Unknown`].
    pub fn require(&self, key: &str) -> Result<&Arc<dyn Lifecycle>, BoundaryError> {
        self.get(key)
            .ok_or_else(|| BoundaryError::Unknown(key.to_string()))
    }

    pub async fn init(&self, key: &str) -> Result<(), BoundaryError> {
        self.require(key)?.init().await
    }

    pub async fn close(&self, key: &str) -> Result<(), BoundaryError> {
        self.require(key)?.close().await
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Lifecycle>)> {
        self.entries.iter().map(|(name, boundary)| (name.as_str(), boundary))
    }

    /// Names of every boundary that is not closed.
    pub fn unclosed(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, boundary)| !boundary.is_closed())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn statuses(&self) -> Vec<(String, Status)> {
        self.entries
            .iter()
            .map(|(name, boundary)| (name.clone(), boundary.status()))
            .collect()
    }
}

impl fmt::Debug for Boundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, boundary)| (name, boundary.status())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{Boundary, BoxError, Resource};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Resource for Noop {
        async fn init_sequence(&self) -> Result<(), BoxError> {
            Ok(())
        }

        async fn close_sequence(&self) -> Result<(), BoxError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_unclosed_lists_open_boundaries_in_order() {
        let boundaries = Boundaries::new()
            .with("db", Boundary::new("db", Noop))
            .with("queue", Boundary::new("queue", Noop))
            .with("cache", Boundary::new("cache", Noop));

        boundaries.init("queue").await.unwrap();
        boundaries.init("db").await.unwrap();
        assert_eq!(boundaries.unclosed(), vec!["db".to_string(), "queue".to_string()]);

        boundaries.close("db").await.unwrap();
        assert_eq!(boundaries.unclosed(), vec!["queue".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let boundaries = Boundaries::new().with("db", Boundary::new("db", Noop));
        let err = boundaries.init("nope").await.unwrap_err();
        assert!(matches!(err, BoundaryError::Unknown(name) if name == "nope"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut boundaries = Boundaries::new()
            .with("db", Boundary::new("db", Noop))
            .with("queue", Boundary::new("queue", Noop));
        boundaries.insert("db", Arc::new(Boundary::new("db-replica", Noop)));

        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries.names().collect::<Vec<_>>(), vec!["db", "queue"]);
        assert_eq!(boundaries.require("db").unwrap().name(), "db-replica");
    }
}
