//! Processing statistics configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LATENCY_WINDOW;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Latency samples retained for averaging. Default: 10_000.
    pub latency_window: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            latency_window: DEFAULT_LATENCY_WINDOW,
        }
    }
}
