//! Settings loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{format_errors, validate_settings, ValidationError};

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl Settings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        validate_settings(&settings).map_err(ConfigError::Validation)?;
        Ok(settings)
    }
}

/// Load and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    Settings::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogFormat, RunMode};
    use std::time::Duration;

    #[test]
    fn test_parse_full_settings() {
        let settings = Settings::from_toml_str(
            r#"
            shutdown_timeout_ms = 5000
            mode = "diagnostic"
            listen_address = "127.0.0.1:7000"

            [boundaries.upstream]
            reinit_delay_ms = 250

            [logging]
            level = "info"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(settings.mode, RunMode::Diagnostic);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(
            settings.boundary("upstream").and_then(|b| b.reinit_delay()),
            Some(Duration::from_millis(250))
        );
        assert_eq!(settings.extra_str("listen_address"), Some("127.0.0.1:7000"));
        assert!(!settings.extra.contains_key("boundaries"));
    }

    #[test]
    fn test_missing_shutdown_timeout_is_parse_error() {
        let err = Settings::from_toml_str("some = \"val\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_timeout_is_validation_error() {
        let err = Settings::from_toml_str("shutdown_timeout_ms = 0").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::ZeroShutdownTimeout]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_settings(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
