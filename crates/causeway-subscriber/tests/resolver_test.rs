use causeway_core::errors::StoreError;
use causeway_core::models::Change;
use causeway_core::traits::LocalStore;
use causeway_core::{ApplyOutcome, Dependency, DependencyKind};
use causeway_storage::MemoryStore;
use causeway_subscriber::{resolver, Dependencies};

fn render(wait_set: &[Dependency]) -> Vec<String> {
    wait_set.iter().map(ToString::to_string).collect()
}

#[test]
fn write_precondition_is_evaluated_before_read() {
    let deps = Dependencies {
        read: vec![Dependency::read("K", 5)],
        write: vec![Dependency::write("K", 7)],
    };
    let wait_set = resolver::happens_before(&deps);
    assert_eq!(render(&wait_set), vec!["K:6", "K:5"]);
    assert_eq!(wait_set[0].kind(), DependencyKind::Write);
    assert_eq!(wait_set[1].kind(), DependencyKind::Read);
}

#[test]
fn duplicate_reads_collapse() {
    let deps = Dependencies {
        read: vec![
            Dependency::read("a", 1),
            Dependency::read("b", 2),
            Dependency::read("a", 1),
        ],
        write: vec![],
    };
    assert_eq!(render(&resolver::happens_before(&deps)), vec!["b:2", "a:1"]);
}

#[test]
fn satisfaction_tracks_local_versions() {
    let store = MemoryStore::new();
    let wait_set = resolver::happens_before(&Dependencies {
        read: vec![Dependency::read("K", 5)],
        write: vec![Dependency::write("K", 7)],
    });

    store.set_version("K", 5).unwrap();
    let blocked = resolver::first_unsatisfied(&wait_set, &store).unwrap();
    assert_eq!(blocked.map(ToString::to_string), Some("K:6".to_string()));
    assert!(!resolver::is_satisfied(&wait_set, &store).unwrap());

    store.set_version("K", 6).unwrap();
    assert!(resolver::is_satisfied(&wait_set, &store).unwrap());

    // Newer local state still satisfies.
    store.set_version("K", 9).unwrap();
    assert!(resolver::is_satisfied(&wait_set, &store).unwrap());
}

#[test]
fn write_at_one_is_satisfied_by_empty_store() {
    let wait_set = resolver::happens_before(&Dependencies {
        read: vec![],
        write: vec![Dependency::write("fresh", 1)],
    });
    assert!(resolver::is_satisfied(&wait_set, &MemoryStore::new()).unwrap());
}

#[test]
fn empty_wait_set_is_trivially_satisfied() {
    assert!(resolver::is_satisfied(&[], &MemoryStore::new()).unwrap());
}

struct BrokenStore;

impl LocalStore for BrokenStore {
    fn version_of(&self, _key: &str) -> Result<u64, StoreError> {
        Err(StoreError::backend("disk on fire"))
    }

    fn apply(&self, _change: &Change<'_>) -> ApplyOutcome {
        ApplyOutcome::Failed(StoreError::backend("disk on fire"))
    }
}

#[test]
fn store_errors_propagate() {
    let wait_set = [Dependency::read("a", 1)];
    let err = resolver::is_satisfied(&wait_set, &BrokenStore).unwrap_err();
    assert!(matches!(err, StoreError::Backend { .. }));
}
