//! BrokerHandle: one delivery's acknowledgment capability.

use crate::errors::TransportError;

/// Opaque handle to a single broker delivery.
///
/// Deliveries that are never acknowledged are redelivered by the broker.
pub trait BrokerHandle: Send + Sync {
    fn acknowledge(&self) -> Result<(), TransportError>;
}
