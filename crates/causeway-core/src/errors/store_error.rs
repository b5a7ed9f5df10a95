//! Local store errors.

use super::error_code::{self, CausewayErrorCode};

/// Failures reported by a local store adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The entity was not at the expected prior version at apply time.
    #[error("apply conflict on {key}: expected version {expected}, found {found}")]
    Conflict { key: String, expected: u64, found: u64 },

    /// Any other backend failure (I/O, SQL, poisoned lock).
    #[error("store backend error: {message}")]
    Backend { message: String },

    #[error("store migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl CausewayErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict { .. } => error_code::APPLY_CONFLICT,
            Self::Backend { .. } | Self::MigrationFailed { .. } => error_code::STORE_ERROR,
        }
    }
}
