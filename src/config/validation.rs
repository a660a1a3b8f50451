//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least one [[server]] block is required")]
    NoServers,
    #[error("server #{0}: host is required")]
    MissingHost(usize),
    #[error("server #{0}: port must be non-zero")]
    InvalidPort(usize),
    #[error("{field} must be a single non-empty word, got '{value}'")]
    InvalidWord { field: String, value: String },
    #[error("engine.retry_backoff_secs must be at least 1")]
    ZeroBackoff,
    #[error("engine.max_connect_attempts must be at least 1")]
    ZeroAttempts,
    #[error("engine.max_line_len must be at least 16, got {0}")]
    LineLimitTooSmall(usize),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.servers.is_empty() {
        errors.push(ValidationError::NoServers);
    }

    for (idx, server) in config.servers.iter().enumerate() {
        if server.host.trim().is_empty() {
            errors.push(ValidationError::MissingHost(idx));
        }
        if server.port == 0 {
            errors.push(ValidationError::InvalidPort(idx));
        }
    }

    // NICK and USER take these as middle parameters, so no spaces
    for conn in config.connections() {
        check_word(&mut errors, "nick", &conn.nick);
        check_word(&mut errors, "ident", &conn.ident);
    }

    if config.engine.retry_backoff_secs == 0 {
        errors.push(ValidationError::ZeroBackoff);
    }
    if config.engine.max_connect_attempts == Some(0) {
        errors.push(ValidationError::ZeroAttempts);
    }
    if config.engine.max_line_len < 16 {
        errors.push(ValidationError::LineLimitTooSmall(config.engine.max_line_len));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_word(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.is_empty() || value.contains(char::is_whitespace) {
        let err = ValidationError::InvalidWord {
            field: field.to_string(),
            value: value.to_string(),
        };
        if !errors.contains(&err) {
            errors.push(err);
        }
    }
}
