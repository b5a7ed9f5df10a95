//! Tests for the tracing setup.

use std::sync::Mutex;

use causeway_core::tracing::init_tracing;
use causeway_core::tracing::spans::names;

/// Serializes tests that touch the process environment.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn init_tracing_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
}

#[test]
fn invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CAUSEWAY_LOG", "this_is_not=a=filter");
    init_tracing();
    std::env::remove_var("CAUSEWAY_LOG");
}

#[test]
fn span_names_are_namespaced() {
    for name in [names::PROCESS, names::WAIT, names::APPLY] {
        assert!(name.starts_with("causeway."));
    }
}
