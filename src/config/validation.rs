//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (threshold and timeouts > 0)
//! - Reject unknown log levels
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SupervisorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use crate::config::schema::SupervisorConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SupervisorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.breaker.failure_threshold == 0 {
        errors.push(ValidationError::new(
            "breaker.failure_threshold",
            "must be at least 1",
        ));
    }

    if config.breaker.open_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "breaker.open_timeout_ms",
            "must be greater than 0",
        ));
    }

    if config.timeouts.call_ms == Some(0) {
        errors.push(ValidationError::new(
            "timeouts.call_ms",
            "must be greater than 0 when set",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "unknown level '{}', expected one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SupervisorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = SupervisorConfig::default();
        config.breaker.failure_threshold = 0;
        config.breaker.open_timeout_ms = 0;
        config.timeouts.call_ms = Some(0);
        config.observability.log_level = "verbose".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "breaker.failure_threshold",
                "breaker.open_timeout_ms",
                "timeouts.call_ms",
                "observability.log_level",
            ]
        );
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = SupervisorConfig::default();
        config.observability.log_level = "WARN".into();
        assert!(validate_config(&config).is_ok());
    }
}
