//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     "Starting..." → install process handlers (signals.rs, process.rs)
//!     → Application::start_sequence (boundary init calls, caller-ordered)
//!     → "Started" | fatal + exit 1
//!
//! Shutdown (shutdown.rs):
//!     "Stopping..." → Application::stop_sequence raced against shutdown_timeout
//!     → "Stopped" | unclosed boundaries reported + exit 1
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT/SIGHUP → stop()
//!     SIGUSR1 → diagnostic log line only
//! ```
//!
//! # Design Decisions
//! - Signal handlers are installed before any boundary opens, so a failed
//!   startup still gets a best-effort stop
//! - Ordering is application knowledge: sequences are supplied, never inferred
//! - Shutdown has a deadline: forced exit when the stop sequence stalls
//! - Diagnostic mode returns every failure to the caller instead of exiting

pub mod orchestrator;
pub mod process;
pub mod sequence;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use orchestrator::Orchestrator;
pub use sequence::{Application, StagedSequence};
pub use shutdown::{Shutdown, StopOutcome};
