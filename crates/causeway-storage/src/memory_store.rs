//! In-memory local store.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use causeway_core::errors::StoreError;
use causeway_core::models::Change;
use causeway_core::traits::LocalStore;
use causeway_core::ApplyOutcome;

use crate::journal::JournalEntry;

#[derive(Debug, Default)]
struct State {
    versions: HashMap<String, u64>,
    applied: HashSet<(String, u64)>,
    journal: Vec<JournalEntry>,
}

/// Versions, applied writes and the change journal behind one mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entity at a version, as if earlier changes had been applied.
    pub fn set_version(&self, key: &str, version: u64) -> Result<(), StoreError> {
        self.lock()?.versions.insert(key.to_string(), version);
        Ok(())
    }

    /// Number of changes committed so far.
    pub fn applied_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.journal.len())
    }

    /// Journal entries for one endpoint, in commit order.
    pub fn changes_for(&self, endpoint: &str) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self
            .lock()?
            .journal
            .iter()
            .filter(|entry| entry.endpoint == endpoint)
            .cloned()
            .collect())
    }

    /// The whole journal, in commit order.
    pub fn journal(&self) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self.lock()?.journal.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::backend("memory store lock poisoned"))
    }
}

impl LocalStore for MemoryStore {
    fn version_of(&self, key: &str) -> Result<u64, StoreError> {
        Ok(self.lock()?.versions.get(key).copied().unwrap_or(0))
    }

    fn apply(&self, change: &Change<'_>) -> ApplyOutcome {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(e) => return ApplyOutcome::Failed(e),
        };

        if let Some(first) = change.writes.first() {
            let all_applied = change
                .writes
                .iter()
                .all(|w| state.applied.contains(&(w.key().to_string(), w.version())));
            if all_applied {
                return ApplyOutcome::AlreadyApplied {
                    write: first.clone(),
                };
            }

            for write in change.writes {
                let expected = write.precondition().version();
                let found = state.versions.get(write.key()).copied().unwrap_or(0);
                if found != expected {
                    return ApplyOutcome::Failed(StoreError::Conflict {
                        key: write.key().to_string(),
                        expected,
                        found,
                    });
                }
            }

            for write in change.writes {
                state
                    .versions
                    .insert(write.key().to_string(), write.version());
                state
                    .applied
                    .insert((write.key().to_string(), write.version()));
            }
        }

        state.journal.push(JournalEntry::from(change));
        ApplyOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_core::Dependency;
    use serde_json::json;

    #[test]
    fn unknown_key_is_at_zero() {
        assert_eq!(MemoryStore::new().version_of("nobody").unwrap(), 0);
    }

    #[test]
    fn read_only_change_is_journaled() {
        let store = MemoryStore::new();
        let payload = json!({});
        let reads = [Dependency::read("k", 0)];
        let change = Change {
            endpoint: "audit",
            timestamp: 1,
            payload: &payload,
            reads: &reads,
            writes: &[],
        };
        assert_eq!(store.apply(&change), ApplyOutcome::Applied);
        assert_eq!(store.apply(&change), ApplyOutcome::Applied);
        assert_eq!(store.applied_count().unwrap(), 2);
    }
}
