//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Address resolution is left to the bind step; only emptiness is checked here

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in a [`ServerConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("address must not be empty")]
    EmptyAddress,

    #[error("shutdown_timeout_secs must be greater than zero")]
    ZeroShutdownTimeout,

    #[error("unknown log level `{0}`")]
    UnknownLogLevel(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.address.trim().is_empty() {
        errors.push(ValidationError::EmptyAddress);
    }
    if config.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::ZeroShutdownTimeout);
    }
    if !LOG_LEVELS.contains(&config.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.log_level.clone()));
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
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let config = ServerConfig {
            address: "  ".into(),
            shutdown_timeout_secs: 0,
            log_level: "loud".into(),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyAddress,
                ValidationError::ZeroShutdownTimeout,
                ValidationError::UnknownLogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let config = ServerConfig {
            log_level: "DEBUG".into(),
            ..ServerConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
