//! Dependency wait errors.

use std::fmt;
use std::time::Duration;

use super::error_code::{self, CausewayErrorCode};

/// Why a wait on a happens-before wait-set stopped before it was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// The injected cancellation token fired (e.g. shutdown).
    Cancelled,
    /// The configured wait timeout elapsed.
    TimedOut,
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled"),
            Self::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Errors raised while waiting on a wait-set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error("wait abandoned ({reason}) after {attempts} attempts in {waited:?}, blocked on {blocked_on}")]
    Abandoned {
        reason: AbandonReason,
        /// The first unsatisfied dependency at the time of abandonment.
        blocked_on: String,
        attempts: u32,
        waited: Duration,
    },
}

impl WaitError {
    pub fn reason(&self) -> AbandonReason {
        match self {
            Self::Abandoned { reason, .. } => *reason,
        }
    }
}

impl CausewayErrorCode for WaitError {
    fn error_code(&self) -> &'static str {
        error_code::DEPENDENCY_WAIT_ABANDONED
    }
}
