//! # causeway-core
//!
//! Foundation crate for the Causeway causal subscriber.
//! Defines the dependency value type, change models, errors, config,
//! capability traits, constants, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod dependency;
pub mod errors;
pub mod models;
pub mod tracing;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CausewayConfig;
pub use dependency::{Dependency, DependencyKind};
pub use errors::{CausewayError, CausewayResult};
pub use models::{ApplyOutcome, Change};
