//! Configuration errors.

use super::error_code::{self, CausewayErrorCode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl CausewayErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
