//! # causeway-storage
//!
//! Reference [`LocalStore`](causeway_core::traits::LocalStore) adapters.
//!
//! - [`MemoryStore`]: mutex-guarded maps, for tests and embedding
//! - [`SqliteStore`]: rusqlite with WAL pragmas and versioned migrations
//!
//! Both apply a change all-or-nothing: every written key must sit at the
//! version just below the one being written, or nothing changes.

pub mod journal;
pub mod memory_store;
pub mod migrations;
pub mod pool;
pub mod sqlite_store;

pub use journal::JournalEntry;
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

use causeway_core::errors::StoreError;

/// Convert any displayable backend error into a `StoreError`.
pub(crate) fn to_store_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::backend(e.to_string())
}
