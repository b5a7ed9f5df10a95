//! Backoff and timeout for happens-before waits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_MAX_BACKOFF_MS, DEFAULT_WAIT_TIMEOUT_SECS,
};

/// Bounded exponential backoff between wait-set evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// First sleep between evaluations. Default: 10ms.
    pub initial_backoff_ms: u64,
    /// Backoff ceiling (doubles each attempt up to this). Default: 1000ms.
    pub max_backoff_ms: u64,
    /// Abandon the wait after this many seconds. Default: 30.
    /// `None` waits until cancelled.
    pub timeout_secs: Option<u64>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            timeout_secs: Some(DEFAULT_WAIT_TIMEOUT_SECS),
        }
    }
}

impl WaitConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
