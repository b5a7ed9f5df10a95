//! Record of an applied change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use causeway_core::models::Change;
use causeway_core::Dependency;

/// One committed change, as kept by a store's journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub endpoint: String,
    pub timestamp: i64,
    pub writes: Vec<Dependency>,
    pub payload: Value,
}

impl From<&Change<'_>> for JournalEntry {
    fn from(change: &Change<'_>) -> Self {
        Self {
            endpoint: change.endpoint.to_string(),
            timestamp: change.timestamp,
            writes: change.writes.to_vec(),
            payload: change.payload.clone(),
        }
    }
}
