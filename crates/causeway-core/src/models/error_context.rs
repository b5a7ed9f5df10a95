//! Context attached to every error-sink report.

use serde::Serialize;

/// Where an error happened, for the error sink.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorContext {
    /// Endpoint of the message, when parsing got that far.
    pub endpoint: Option<String>,
    /// Per-delivery correlation id.
    pub delivery_id: String,
    /// The raw payload as received.
    pub payload: String,
}
