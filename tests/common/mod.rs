//! Shared utilities for orchestrator integration tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use basement::{BoxError, Logger, Resource};

/// Level recorded by [`RecordingLogger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Trace,
    Info,
    Error,
    Fatal,
}

/// Logger that keeps every line in memory.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

#[allow(dead_code)]
impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn trace(&self, message: &str) {
        self.push(Level::Trace, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn fatal(&self, message: &str) {
        self.push(Level::Fatal, message);
    }
}

#[derive(Default)]
pub struct Calls {
    pub init: AtomicU32,
    pub close: AtomicU32,
}

/// Programmable resource: delays, failing inits, failing close.
///
/// Clones share the call counters, so a test can keep one copy while the
/// boundary owns another.
#[derive(Clone, Default)]
pub struct MockResource {
    init_delay: Duration,
    close_delay: Duration,
    failing_inits: u32,
    fail_close: bool,
    calls: Arc<Calls>,
}

#[allow(dead_code)]
impl MockResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    pub fn close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    /// The first `count` init attempts fail.
    pub fn failing_inits(mut self, count: u32) -> Self {
        self.failing_inits = count;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn init_calls(&self) -> u32 {
        self.calls.init.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> u32 {
        self.calls.close.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resource for MockResource {
    async fn init_sequence(&self) -> Result<(), BoxError> {
        let call = self.calls.init.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.init_delay.is_zero() {
            tokio::time::sleep(self.init_delay).await;
        }
        if call <= self.failing_inits {
            return Err(format!("init attempt {call} failed").into());
        }
        Ok(())
    }

    async fn close_sequence(&self) -> Result<(), BoxError> {
        self.calls.close.fetch_add(1, Ordering::SeqCst);
        if !self.close_delay.is_zero() {
            tokio::time::sleep(self.close_delay).await;
        }
        if self.fail_close {
            return Err("close failed".into());
        }
        Ok(())
    }
}
