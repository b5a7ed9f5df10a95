//! LocalStore: the replica the subscriber applies changes to.

use crate::errors::StoreError;
use crate::models::{ApplyOutcome, Change};

/// Local data-store capability shared by every concurrent pipeline.
///
/// Implementations own their concurrency control. `apply` must be atomic
/// per change and must compare before applying: each written key has to be
/// at `version - 1`, otherwise the store reports [`StoreError::Conflict`].
/// A write whose `(key, version)` was already committed yields
/// [`ApplyOutcome::AlreadyApplied`].
pub trait LocalStore: Send + Sync {
    /// Locally visible version of `key`. Never-written keys are at 0.
    fn version_of(&self, key: &str) -> Result<u64, StoreError>;

    /// Apply one change atomically.
    fn apply(&self, change: &Change<'_>) -> ApplyOutcome;

    /// Run `work` inside a store-scoped unit of work.
    ///
    /// Stores that need per-message setup or cleanup (sessions, connection
    /// checkout) override this. The default just runs `work`.
    fn with_unit_of_work<T, F>(&self, endpoint: &str, work: F) -> T
    where
        Self: Sized,
        F: FnOnce(&Self) -> T,
    {
        let _ = endpoint;
        work(self)
    }
}
