//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator protocol messages (starting, stopping, forced shutdown):
//!     → logging.rs Logger capability (injected, TracingLogger by default)
//!
//! Boundary transitions and retries:
//!     → tracing events with `boundary` field
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout/stderr (fmt or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The logger is passed explicitly; there is no swappable global sink
//! - Error-level lines go to stderr, everything else to stdout
//! - Metrics go through the `metrics` facade and are no-ops without an exporter

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, Logger, TracingLogger};
