//! Tests for the capability traits' default behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use causeway_core::errors::{CausewayError, PayloadError, StoreError};
use causeway_core::models::{ApplyOutcome, Change, ErrorContext};
use causeway_core::traits::*;
use causeway_core::Dependency;

struct FixedStore;

impl LocalStore for FixedStore {
    fn version_of(&self, _key: &str) -> Result<u64, StoreError> {
        Ok(3)
    }

    fn apply(&self, _change: &Change<'_>) -> ApplyOutcome {
        ApplyOutcome::Applied
    }
}

struct PanickingSink;

impl ErrorSink for PanickingSink {
    fn report(&self, _error: &CausewayError, _context: &ErrorContext) {
        panic!("sink exploded");
    }
}

#[derive(Default)]
struct CountingSink(AtomicUsize);

impl ErrorSink for CountingSink {
    fn report(&self, _error: &CausewayError, _context: &ErrorContext) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn default_unit_of_work_runs_work_once() {
    let store = FixedStore;
    let payload = serde_json::json!({});
    let writes = [Dependency::write("k", 4)];
    let change = Change {
        endpoint: "users/update",
        timestamp: 0,
        payload: &payload,
        reads: &[],
        writes: &writes,
    };
    let mut calls = 0;
    let outcome = store.with_unit_of_work("users/update", |s| {
        calls += 1;
        s.apply(&change)
    });
    assert_eq!(outcome, ApplyOutcome::Applied);
    assert_eq!(calls, 1);
    assert_eq!(change.writes.len(), 1);
}

#[test]
fn report_contained_survives_panicking_sink() {
    let err: CausewayError = PayloadError::NotAnObject.into();
    assert!(!report_contained(&PanickingSink, &err, &ErrorContext::default()));
}

#[test]
fn report_contained_forwards_to_sink() {
    let sink = CountingSink::default();
    let err: CausewayError = PayloadError::NotAnObject.into();
    assert!(report_contained(&sink, &err, &ErrorContext::default()));
    assert_eq!(sink.0.load(Ordering::SeqCst), 1);
}

#[test]
fn apply_outcome_acknowledgeability() {
    assert!(ApplyOutcome::Applied.is_acknowledgeable());
    assert!(ApplyOutcome::AlreadyApplied {
        write: Dependency::write("k", 1)
    }
    .is_acknowledgeable());
    assert!(!ApplyOutcome::Failed(StoreError::backend("x")).is_acknowledgeable());
}

#[test]
fn cancellation_token_clones_share_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());
    token.cancel();
    assert!(clone.is_cancelled());
}

#[tokio::test]
async fn cancelled_wakes_parked_waiter() {
    let token = CancellationToken::new();
    let waiter = {
        let token = token.clone();
        tokio::spawn(async move { token.cancelled().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter should wake after cancel")
        .unwrap();
}

#[tokio::test]
async fn cancelled_returns_immediately_when_already_cancelled() {
    let token = Arc::new(CancellationToken::new());
    token.cancel();
    tokio::time::timeout(Duration::from_millis(100), token.cancelled())
        .await
        .unwrap();
}
