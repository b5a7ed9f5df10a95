//! Data models exchanged between the subscriber and its collaborators.

pub mod apply_outcome;
pub mod change;
pub mod error_context;

pub use apply_outcome::ApplyOutcome;
pub use change::Change;
pub use error_context::ErrorContext;
