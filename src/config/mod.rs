//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → owned by the Orchestrator, read by boundaries and binaries
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once the orchestrator is constructed
//! - `shutdown_timeout_ms` is the only required key; everything else has defaults
//! - Unknown top-level keys are kept in `Settings::extra` for the application
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, ConfigError};
pub use schema::{
    BoundarySettings, LogFormat, LoggingConfig, ObservabilityConfig, RunMode, Settings,
};
pub use validation::{validate_settings, ValidationError};
