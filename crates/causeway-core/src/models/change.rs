//! The change handed to a local store for application.

use serde_json::Value;

use crate::dependency::Dependency;

/// A parsed change, borrowed from the message that carries it.
#[derive(Debug, Clone, Copy)]
pub struct Change<'a> {
    /// Logical operation name the producer routed the change to.
    pub endpoint: &'a str,
    /// Producer-side epoch seconds.
    pub timestamp: i64,
    /// The full decoded payload.
    pub payload: &'a Value,
    /// Declared read dependencies.
    pub reads: &'a [Dependency],
    /// Declared write dependencies. Stores use these for compare-and-apply
    /// and for duplicate detection.
    pub writes: &'a [Dependency],
}
