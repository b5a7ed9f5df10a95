use causeway_core::errors::StoreError;
use causeway_core::models::Change;
use causeway_core::traits::LocalStore;
use causeway_core::{ApplyOutcome, Dependency};
use causeway_storage::MemoryStore;
use serde_json::json;

fn apply_writes(store: &MemoryStore, endpoint: &str, writes: &[Dependency]) -> ApplyOutcome {
    let payload = json!({ "__amqp__": endpoint });
    store.apply(&Change {
        endpoint,
        timestamp: 0,
        payload: &payload,
        reads: &[],
        writes,
    })
}

#[test]
fn write_at_one_applies_to_empty_store() {
    let store = MemoryStore::new();
    let outcome = apply_writes(&store, "users", &[Dependency::write("u1", 1)]);
    assert_eq!(outcome, ApplyOutcome::Applied);
    assert_eq!(store.version_of("u1").unwrap(), 1);
    assert_eq!(store.applied_count().unwrap(), 1);
}

#[test]
fn reapplying_same_write_is_already_applied() {
    let store = MemoryStore::new();
    let writes = [Dependency::write("u1", 1)];
    assert_eq!(apply_writes(&store, "users", &writes), ApplyOutcome::Applied);
    match apply_writes(&store, "users", &writes) {
        ApplyOutcome::AlreadyApplied { write } => assert_eq!(write.to_string(), "u1:1"),
        other => panic!("expected AlreadyApplied, got {other:?}"),
    }
    assert_eq!(store.applied_count().unwrap(), 1);
}

#[test]
fn stale_precondition_is_a_conflict() {
    let store = MemoryStore::new();
    store.set_version("u1", 3).unwrap();
    let outcome = apply_writes(&store, "users", &[Dependency::write("u1", 3)]);
    assert_eq!(
        outcome,
        ApplyOutcome::Failed(StoreError::Conflict {
            key: "u1".to_string(),
            expected: 2,
            found: 3,
        })
    );
    assert_eq!(store.version_of("u1").unwrap(), 3);
    assert_eq!(store.applied_count().unwrap(), 0);
}

#[test]
fn multi_write_is_all_or_nothing() {
    let store = MemoryStore::new();
    store.set_version("a", 1).unwrap();
    let outcome = apply_writes(
        &store,
        "pair",
        &[Dependency::write("a", 2), Dependency::write("b", 5)],
    );
    assert!(matches!(outcome, ApplyOutcome::Failed(StoreError::Conflict { .. })));
    assert_eq!(store.version_of("a").unwrap(), 1);
    assert_eq!(store.version_of("b").unwrap(), 0);
}

#[test]
fn journal_is_filtered_by_endpoint() {
    let store = MemoryStore::new();
    apply_writes(&store, "users", &[Dependency::write("u1", 1)]);
    apply_writes(&store, "orders", &[Dependency::write("o1", 1)]);
    apply_writes(&store, "users", &[Dependency::write("u1", 2)]);

    let users = store.changes_for("users").unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].writes[0].version(), 2);
    assert_eq!(store.journal().unwrap().len(), 3);
}
