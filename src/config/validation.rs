//! Settings and registry validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over already-deserialized values
//! - Runs before the orchestrator accepts its arguments

use std::net::SocketAddr;
use thiserror::Error;

use crate::boundary::Boundaries;
use crate::config::schema::Settings;

/// A single semantic problem with orchestrator arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("shutdown_timeout_ms must be greater than zero")]
    ZeroShutdownTimeout,

    #[error("boundary names must not be empty")]
    EmptyBoundaryName,

    #[error("reinit_delay_ms for boundary '{0}' must be greater than zero")]
    ZeroReinitDelay(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("at least one boundary must be registered")]
    NoBoundaries,

    #[error("sequence references unregistered boundary '{0}'")]
    UnknownBoundary(String),
}

/// Semantic checks on parsed settings.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.shutdown_timeout_ms == 0 {
        errors.push(ValidationError::ZeroShutdownTimeout);
    }

    for (name, boundary) in &settings.boundaries {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyBoundaryName);
        }
        if boundary.reinit_delay_ms == Some(0) {
            errors.push(ValidationError::ZeroReinitDelay(name.clone()));
        }
    }

    if settings.observability.metrics_enabled
        && settings.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            settings.observability.metrics_address.clone(),
        ));
    }

    into_result(errors)
}

/// Checks on the registry and the names an application sequence refers to.
pub fn validate_boundaries<'a>(
    boundaries: &Boundaries,
    referenced: impl IntoIterator<Item = &'a str>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if boundaries.is_empty() {
        errors.push(ValidationError::NoBoundaries);
    }
    if boundaries.names().any(|name| name.trim().is_empty()) {
        errors.push(ValidationError::EmptyBoundaryName);
    }
    for name in referenced {
        if !boundaries.contains(name) {
            errors.push(ValidationError::UnknownBoundary(name.to_string()));
        }
    }

    into_result(errors)
}

pub(crate) fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundarySettings;
    use std::time::Duration;

    #[test]
    fn test_collects_every_error() {
        let mut settings = Settings::new(Duration::ZERO)
            .with_boundary("queue", BoundarySettings { reinit_delay_ms: Some(0) });
        settings.observability.metrics_enabled = true;
        settings.observability.metrics_address = "not-an-address".into();

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroShutdownTimeout,
                ValidationError::ZeroReinitDelay("queue".into()),
                ValidationError::InvalidMetricsAddress("not-an-address".into()),
            ]
        );
    }

    #[test]
    fn test_valid_settings() {
        let settings = Settings::new(Duration::from_secs(1))
            .with_boundary("queue", BoundarySettings::with_reinit_delay(Duration::from_millis(50)));
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_empty_registry() {
        let errors = validate_boundaries(&Boundaries::new(), ["db"]).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::NoBoundaries,
                ValidationError::UnknownBoundary("db".into()),
            ]
        );
    }
}
