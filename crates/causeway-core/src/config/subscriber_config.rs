//! Message handling configuration.
//!
//! # Examples
//!
//! ```
//! use causeway_core::config::SubscriberConfig;
//!
//! let config = SubscriberConfig::default();
//! assert!(!config.bareback);
//! assert_eq!(config.endpoint_field, "__amqp__");
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENDPOINT_FIELD, DEFAULT_WORKERS};

/// How inbound messages are interpreted and how many run concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriberConfig {
    /// Skip causal gating entirely. Default: false.
    pub bareback: bool,
    /// Payload field holding the routing endpoint. Default: "__amqp__".
    pub endpoint_field: String,
    /// Concurrent pipelines sharing the local store. Default: 4.
    pub workers: usize,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            bareback: false,
            endpoint_field: DEFAULT_ENDPOINT_FIELD.to_string(),
            workers: DEFAULT_WORKERS,
        }
    }
}
