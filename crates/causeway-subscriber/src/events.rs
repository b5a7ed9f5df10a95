//! Structured log events for the commit pipeline.
//!
//! Each function emits a `tracing` event with structured fields.

use causeway_core::errors::{CausewayErrorCode, PayloadError, StoreError, TransportError, WaitError};

use crate::ack::AckKind;

/// Log a message whose payload could not be parsed.
pub fn malformed_payload(delivery_id: &str, error: &PayloadError) {
    tracing::warn!(
        event = "malformed_payload",
        delivery_id = %delivery_id,
        code = error.error_code(),
        error = %error,
        "malformed payload dropped without ack"
    );
}

/// Log a message entering the dependency wait.
pub fn waiting_on_dependencies(endpoint: &str, wait_set_len: usize) {
    tracing::debug!(
        event = "waiting_on_dependencies",
        endpoint = %endpoint,
        wait_set = wait_set_len,
        "waiting on dependencies"
    );
}

/// Log an abandoned dependency wait.
pub fn wait_abandoned(endpoint: &str, error: &WaitError) {
    tracing::debug!(
        event = "wait_abandoned",
        endpoint = %endpoint,
        reason = %error.reason(),
        error = %error,
        "dependency wait abandoned"
    );
}

/// Log a committed change.
pub fn change_applied(endpoint: &str, timestamp: i64) {
    tracing::info!(
        event = "change_applied",
        endpoint = %endpoint,
        timestamp = timestamp,
        "change applied"
    );
}

/// Log a redelivered change that was already committed.
pub fn already_applied(endpoint: &str, write: &str) {
    tracing::debug!(
        event = "already_applied",
        endpoint = %endpoint,
        write = %write,
        "already processed"
    );
}

/// Log a store failure.
pub fn apply_failed(endpoint: &str, error: &StoreError) {
    tracing::warn!(
        event = "apply_failed",
        endpoint = %endpoint,
        code = error.error_code(),
        error = %error,
        "apply failed, leaving delivery unacknowledged"
    );
}

/// Log a successful acknowledgment.
pub fn acknowledged(delivery_id: &str, kind: AckKind) {
    tracing::debug!(
        event = "acknowledged",
        delivery_id = %delivery_id,
        kind = ?kind,
        "delivery acknowledged"
    );
}

/// Log a failed acknowledgment.
pub fn ack_failed(delivery_id: &str, error: &TransportError) {
    tracing::warn!(
        event = "ack_failed",
        delivery_id = %delivery_id,
        error = %error,
        "acknowledgment failed"
    );
}

/// Log a worker pool shutdown.
pub fn workers_stopped(workers: usize, processed: u64) {
    tracing::info!(
        event = "workers_stopped",
        workers = workers,
        processed = processed,
        "subscriber workers stopped"
    );
}
