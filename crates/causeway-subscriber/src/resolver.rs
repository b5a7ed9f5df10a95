//! Happens-before resolution.
//!
//! Turns declared read/write dependencies into the ordered wait-set that
//! must be locally visible before a change applies, and evaluates that set
//! against a [`LocalStore`].

use std::collections::HashSet;

use causeway_core::errors::StoreError;
use causeway_core::traits::LocalStore;
use causeway_core::Dependency;

use crate::message::Dependencies;

/// Compute the wait-set for a set of declared dependencies.
///
/// Reads are taken as-is, each write contributes its prior version. The
/// combined list is deduplicated by `(key, version)` keeping the first
/// occurrence, then reversed, so preconditions of writes are evaluated
/// before reads.
///
/// ```
/// use causeway_core::Dependency;
/// use causeway_subscriber::{resolver, Dependencies};
///
/// let deps = Dependencies {
///     read: vec![Dependency::read("k", 5)],
///     write: vec![Dependency::write("k", 7)],
/// };
/// let wait_set: Vec<String> = resolver::happens_before(&deps)
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(wait_set, vec!["k:6", "k:5"]);
/// ```
pub fn happens_before(dependencies: &Dependencies) -> Vec<Dependency> {
    let mut seen = HashSet::new();
    let mut wait_set: Vec<Dependency> = dependencies
        .read
        .iter()
        .cloned()
        .chain(dependencies.write.iter().map(Dependency::precondition))
        .filter(|dep| seen.insert((dep.key().to_string(), dep.version())))
        .collect();
    wait_set.reverse();
    wait_set
}

/// The first dependency in `wait_set` the store does not yet satisfy.
pub fn first_unsatisfied<'a, S>(
    wait_set: &'a [Dependency],
    store: &S,
) -> Result<Option<&'a Dependency>, StoreError>
where
    S: LocalStore + ?Sized,
{
    for dep in wait_set {
        if !dep.is_satisfied_by(store.version_of(dep.key())?) {
            return Ok(Some(dep));
        }
    }
    Ok(None)
}

/// True when every dependency in `wait_set` is locally visible.
pub fn is_satisfied<S>(wait_set: &[Dependency], store: &S) -> Result<bool, StoreError>
where
    S: LocalStore + ?Sized,
{
    Ok(first_unsatisfied(wait_set, store)?.is_none())
}
