//! Malformed payload errors.

use super::error_code::{self, CausewayErrorCode};

/// The payload could not be parsed into its required fields.
///
/// Fatal for the delivery attempt: never acknowledged, reported once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid field {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("invalid dependency token {token:?}: {reason}")]
    InvalidDependency { token: String, reason: String },
}

impl CausewayErrorCode for PayloadError {
    fn error_code(&self) -> &'static str {
        error_code::MALFORMED_PAYLOAD
    }
}
