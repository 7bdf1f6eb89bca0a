//! Boundary subsystem.
//!
//! A boundary wraps one external resource (database pool, queue client,
//! listener) behind an explicit init/close lifecycle.
//!
//! # State Machine
//! ```text
//! Closed ──init──▶ Initializing ──ok──▶ Opened ──close──▶ Closing ──ok──▶ Closed
//!                      │                  ▲                  │
//!                      └──err──▶ Closed   └──────err─────────┘
//!
//! Auto-recovering variant (auto_recovering.rs):
//!     Initializing ──err──▶ WaitingReinit ──delay──▶ Initializing
//!     WaitingReinit ──close──▶ Closed (timer cancelled, close hook skipped)
//! ```
//!
//! # Design Decisions
//! - Status is per instance; the registry (registry.rs) owns the instances
//! - Preconditions are checked and applied atomically
//! - Concrete resources only supply `init_sequence`/`close_sequence`

pub mod auto_recovering;
pub mod base;
pub mod error;
pub mod registry;
pub mod state;

use async_trait::async_trait;

pub use auto_recovering::AutoRecoveringBoundary;
pub use base::Boundary;
pub use error::{BoundaryError, BoxError, Operation};
pub use registry::Boundaries;
pub use state::Status;

/// Hooks a concrete external resource provides.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Acquire the resource (connect, bind, open).
    async fn init_sequence(&self) -> Result<(), BoxError>;

    /// Release the resource.
    async fn close_sequence(&self) -> Result<(), BoxError>;
}

/// Capability every registered boundary exposes to the orchestrator.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Diagnostic name.
    fn name(&self) -> &str;

    fn status(&self) -> Status;

    async fn init(&self) -> Result<(), BoundaryError>;

    async fn close(&self) -> Result<(), BoundaryError>;

    fn is_closed(&self) -> bool {
        self.status() == Status::Closed
    }

    fn is_opened(&self) -> bool {
        self.status() == Status::Opened
    }

    fn is_waiting_reinit(&self) -> bool {
        self.status() == Status::WaitingReinit
    }
}
