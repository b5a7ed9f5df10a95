//! Error handling for Causeway.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod payload_error;
pub mod store_error;
pub mod transport_error;
pub mod wait_error;

pub use config_error::ConfigError;
pub use error_code::CausewayErrorCode;
pub use payload_error::PayloadError;
pub use store_error::StoreError;
pub use transport_error::TransportError;
pub use wait_error::{AbandonReason, WaitError};

/// Top-level error aggregating every subsystem error via `From` conversions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CausewayError {
    #[error("malformed payload: {0}")]
    Payload(#[from] PayloadError),

    #[error("dependency wait: {0}")]
    Wait(#[from] WaitError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
}

impl CausewayErrorCode for CausewayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Payload(e) => e.error_code(),
            Self::Wait(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::Transport(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type CausewayResult<T> = Result<T, CausewayError>;
