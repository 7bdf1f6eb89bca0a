//! Ordered, fault-aware startup and shutdown of a process's external resources.
//!
//! # Architecture Overview
//!
//! ```text
//!   Settings (config)          Logger (observability)
//!          │                          │
//!          ▼                          ▼
//!   ┌───────────────────────────────────────────────┐
//!   │                 Orchestrator                  │
//!   │  start(): handlers → Application::start_sequence
//!   │  stop():  Application::stop_sequence ⟷ deadline
//!   └──────────────────────┬────────────────────────┘
//!                          │ init / close
//!                          ▼
//!   ┌───────────────────────────────────────────────┐
//!   │ Boundaries registry: name → dyn Lifecycle     │
//!   │   Boundary<R>               (fail fast)       │
//!   │   AutoRecoveringBoundary<R> (fixed-delay retry)│
//!   └──────────────────────┬────────────────────────┘
//!                          │ init_sequence / close_sequence
//!                          ▼
//!                 Resource (db, queue, listener, ...)
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use boundary::{
    AutoRecoveringBoundary, Boundaries, Boundary, BoundaryError, BoxError, Lifecycle, Resource,
    Status,
};
pub use config::{BoundarySettings, RunMode, Settings};
pub use error::{Error, Result};
pub use lifecycle::{Application, Orchestrator, StagedSequence, StopOutcome};
pub use observability::{Logger, TracingLogger};
