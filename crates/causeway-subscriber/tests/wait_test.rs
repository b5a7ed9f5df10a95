use std::sync::Arc;
use std::time::Duration;

use causeway_core::config::WaitConfig;
use causeway_core::errors::{AbandonReason, WaitError};
use causeway_core::traits::{Cancellable, CancellationToken};
use causeway_core::{CausewayError, Dependency};
use causeway_storage::MemoryStore;
use causeway_subscriber::DependencyWaiter;

fn waiter(timeout_secs: Option<u64>) -> DependencyWaiter {
    DependencyWaiter::new(WaitConfig {
        initial_backoff_ms: 10,
        max_backoff_ms: 100,
        timeout_secs,
    })
}

fn abandon_reason(result: Result<causeway_subscriber::WaitReport, CausewayError>) -> WaitError {
    match result {
        Err(CausewayError::Wait(e)) => e,
        other => panic!("expected an abandoned wait, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn satisfied_wait_set_returns_on_first_attempt() {
    let store = MemoryStore::new();
    store.set_version("k", 3).unwrap();
    let report = waiter(None)
        .wait_until_satisfied(&[Dependency::read("k", 3)], &store, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.attempts, 1);
    assert_eq!(report.waited, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn wait_resumes_once_dependency_lands() {
    let store = Arc::new(MemoryStore::new());
    let writer = Arc::clone(&store);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        writer.set_version("k", 1).unwrap();
    });

    let report = waiter(None)
        .wait_until_satisfied(&[Dependency::read("k", 1)], store.as_ref(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(report.attempts > 1);
    assert!(report.waited >= Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn never_satisfied_wait_times_out() {
    let store = MemoryStore::new();
    let err = abandon_reason(
        waiter(Some(2))
            .wait_until_satisfied(&[Dependency::read("k", 1)], &store, &CancellationToken::new())
            .await,
    );
    assert_eq!(err.reason(), AbandonReason::TimedOut);
    match err {
        WaitError::Abandoned {
            blocked_on, waited, ..
        } => {
            assert_eq!(blocked_on, "k:1");
            assert!(waited >= Duration::from_secs(2));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_backoff() {
    let store = MemoryStore::new();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });

    let err = abandon_reason(
        waiter(None)
            .wait_until_satisfied(&[Dependency::read("k", 1)], &store, &token)
            .await,
    );
    assert_eq!(err.reason(), AbandonReason::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn cancellation_wins_over_satisfaction() {
    let store = MemoryStore::new();
    let token = CancellationToken::new();
    token.cancel();
    let err = abandon_reason(
        waiter(None)
            .wait_until_satisfied(&[Dependency::read("k", 0)], &store, &token)
            .await,
    );
    match err {
        WaitError::Abandoned { attempts, .. } => assert_eq!(attempts, 0),
    }
}
