//! Tagged result of a local store apply.

use crate::dependency::Dependency;
use crate::errors::StoreError;

/// What happened when a store was asked to apply a change.
///
/// Consumed by exhaustive match; duplicates are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The change was committed.
    Applied,
    /// This exact causal write was already committed; nothing changed.
    AlreadyApplied { write: Dependency },
    /// The change was not committed.
    Failed(StoreError),
}

impl ApplyOutcome {
    /// True for outcomes that warrant acknowledging the delivery.
    pub fn is_acknowledgeable(&self) -> bool {
        matches!(self, Self::Applied | Self::AlreadyApplied { .. })
    }
}
