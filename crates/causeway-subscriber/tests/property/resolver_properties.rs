use std::collections::HashSet;

use causeway_core::config::SubscriberConfig;
use causeway_core::Dependency;
use causeway_subscriber::{resolver, Dependencies, Message};
use proptest::prelude::*;

fn dependencies() -> impl Strategy<Value = Dependencies> {
    let read = ("[a-c]{1,2}", 0u64..6).prop_map(|(k, v)| Dependency::read(k, v));
    let write = ("[a-c]{1,2}", 1u64..6).prop_map(|(k, v)| Dependency::write(k, v));
    (
        prop::collection::vec(read, 0..8),
        prop::collection::vec(write, 0..4),
    )
        .prop_map(|(read, write)| Dependencies { read, write })
}

proptest! {
    #[test]
    fn wait_set_has_no_duplicates(deps in dependencies()) {
        let wait_set = resolver::happens_before(&deps);
        let distinct: HashSet<&Dependency> = wait_set.iter().collect();
        prop_assert_eq!(distinct.len(), wait_set.len());
    }

    #[test]
    fn wait_set_covers_every_precondition(deps in dependencies()) {
        let wait_set = resolver::happens_before(&deps);
        for read in &deps.read {
            prop_assert!(wait_set.contains(read));
        }
        for write in &deps.write {
            prop_assert!(wait_set.contains(&write.precondition()));
        }
        prop_assert!(wait_set.len() <= deps.read.len() + deps.write.len());
    }

    #[test]
    fn resolution_is_deterministic(deps in dependencies()) {
        prop_assert_eq!(resolver::happens_before(&deps), resolver::happens_before(&deps));
    }

    #[test]
    fn parsing_arbitrary_input_never_panics(raw in ".{0,120}") {
        let msg = Message::new(raw, &SubscriberConfig::default());
        let first = msg.parsed().cloned();
        let second = msg.parsed().cloned();
        prop_assert_eq!(first, second);
        let _ = msg.to_string();
    }
}
