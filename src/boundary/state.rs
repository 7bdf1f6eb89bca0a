//! Boundary status and its atomic storage.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle status of a boundary.
///
/// `WaitingReinit` is only ever entered by auto-recovering boundaries.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Closed = 0,
    Initializing = 1,
    Opened = 2,
    Closing = 3,
    WaitingReinit = 4,
}

impl Status {
    /// Stable lowercase name, used in log lines and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Closed => "closed",
            Status::Initializing => "initializing",
            Status::Opened => "opened",
            Status::Closing => "closing",
            Status::WaitingReinit => "waiting_reinit",
        }
    }
}

impl From<u8> for Status {
    fn from(val: u8) -> Self {
        match val {
            1 => Status::Initializing,
            2 => Status::Opened,
            3 => Status::Closing,
            4 => Status::WaitingReinit,
            _ => Status::Closed,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-instance status slot.
///
/// Transitions go through [`StatusCell::transition`], a compare-and-swap, so
/// the precondition check and the update happen as one step even when the
/// boundary is shared across worker threads.
#[derive(Debug)]
pub struct StatusCell(AtomicU8);

impl StatusCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(Status::Closed as u8))
    }

    pub fn load(&self) -> Status {
        Status::from(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, status: Status) {
        self.0.store(status as u8, Ordering::Release);
    }

    /// Move from `current` to `next`. On mismatch the observed status is returned.
    pub fn transition(&self, current: Status, next: Status) -> Result<(), Status> {
        self.0
            .compare_exchange(current as u8, next as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(Status::from)
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_starts_closed() {
        let cell = StatusCell::new();
        assert_eq!(cell.load(), Status::Closed);
    }

    #[test]
    fn test_transition_rejects_wrong_precondition() {
        let cell = StatusCell::new();
        assert_eq!(cell.transition(Status::Opened, Status::Closing), Err(Status::Closed));
        assert_eq!(cell.load(), Status::Closed);

        assert!(cell.transition(Status::Closed, Status::Initializing).is_ok());
        assert_eq!(cell.load(), Status::Initializing);
    }

    #[test]
    fn test_status_roundtrips_through_u8() {
        for status in [
            Status::Closed,
            Status::Initializing,
            Status::Opened,
            Status::Closing,
            Status::WaitingReinit,
        ] {
            assert_eq!(Status::from(status as u8), status);
        }
        assert_eq!(Status::from(42), Status::Closed);
    }
}
