//! Broker transport errors.

use super::error_code::{self, CausewayErrorCode};

/// The broker handle failed to record an acknowledgment.
///
/// Best-effort: reported, never rethrown, never retriggers apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("acknowledgment failed: {reason}")]
    AckFailed { reason: String },
}

impl CausewayErrorCode for TransportError {
    fn error_code(&self) -> &'static str {
        error_code::ACK_TRANSPORT_ERROR
    }
}
