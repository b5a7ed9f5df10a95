//! Best-effort acknowledgment.
//!
//! The ack sink forwards to the delivery's broker handle and records the
//! outcome. A failing or panicking handle is reported and logged, never
//! rethrown; the caller's classification stands either way.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;

use causeway_core::errors::TransportError;
use causeway_core::traits::{report_contained, BrokerHandle, ErrorSink};
use causeway_core::CausewayError;

use crate::events;
use crate::message::Message;
use crate::stats::SubscriberStats;

/// Which durable outcome is being acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckKind {
    Applied,
    Duplicate,
}

/// Acknowledges deliveries and feeds the stats sink.
pub struct AckSink {
    stats: Arc<SubscriberStats>,
    errors: Arc<dyn ErrorSink>,
}

impl AckSink {
    pub fn new(stats: Arc<SubscriberStats>, errors: Arc<dyn ErrorSink>) -> Self {
        Self { stats, errors }
    }

    /// Acknowledge `message` through `handle`.
    ///
    /// The returned error is informational; it has already been reported.
    pub fn acknowledge(
        &self,
        handle: &dyn BrokerHandle,
        message: &Message,
        kind: AckKind,
    ) -> Result<(), TransportError> {
        let result = catch_unwind(AssertUnwindSafe(|| handle.acknowledge())).unwrap_or_else(|_| {
            Err(TransportError::AckFailed {
                reason: "broker handle panicked".to_string(),
            })
        });

        match &result {
            Ok(()) => {
                self.stats.notify_processed_message(message, Utc::now());
                events::acknowledged(&message.id().to_string(), kind);
            }
            Err(error) => {
                self.stats.record_ack_failure();
                events::ack_failed(&message.id().to_string(), error);
                report_contained(
                    self.errors.as_ref(),
                    &CausewayError::Transport(error.clone()),
                    &message.error_context(),
                );
            }
        }
        result
    }
}
