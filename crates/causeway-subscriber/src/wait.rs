//! Cancellable wait on a happens-before wait-set.
//!
//! The wait re-evaluates the wait-set against the store with bounded
//! exponential backoff. It holds no lock while sleeping and ends when the
//! set is satisfied, the token is cancelled, or the configured timeout
//! elapses.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use tokio::time::Instant;

use causeway_core::config::WaitConfig;
use causeway_core::errors::{AbandonReason, StoreError, WaitError};
use causeway_core::traits::{Cancellable, CancellationToken, LocalStore};
use causeway_core::{CausewayError, Dependency};

use crate::resolver;

/// How a satisfied wait went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitReport {
    /// Number of wait-set evaluations, including the successful one.
    pub attempts: u32,
    pub waited: Duration,
}

/// Waits for wait-sets to become locally visible.
#[derive(Debug, Clone)]
pub struct DependencyWaiter {
    config: WaitConfig,
}

impl DependencyWaiter {
    pub fn new(config: WaitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Block until every dependency in `wait_set` is satisfied by `store`.
    ///
    /// Cancellation observed before an evaluation wins over satisfaction.
    /// Store errors end the wait immediately; a panicking store counts as
    /// a backend error.
    pub async fn wait_until_satisfied<S>(
        &self,
        wait_set: &[Dependency],
        store: &S,
        cancel: &CancellationToken,
    ) -> Result<WaitReport, CausewayError>
    where
        S: LocalStore + ?Sized,
    {
        let started = Instant::now();
        let deadline = self.config.timeout().map(|timeout| started + timeout);
        let max_backoff = self.config.max_backoff();
        let mut backoff = self.config.initial_backoff().min(max_backoff);
        let mut attempts: u32 = 0;
        let mut blocked_on = wait_set.first().map(ToString::to_string).unwrap_or_default();

        loop {
            if cancel.is_cancelled() {
                return Err(abandoned(AbandonReason::Cancelled, blocked_on, attempts, started));
            }

            attempts = attempts.saturating_add(1);
            let evaluated = catch_unwind(AssertUnwindSafe(|| {
                resolver::first_unsatisfied(wait_set, store)
            }))
            .unwrap_or_else(|_| Err(StoreError::backend("local store panicked during wait")));
            match evaluated? {
                None => {
                    return Ok(WaitReport {
                        attempts,
                        waited: started.elapsed(),
                    })
                }
                Some(dep) => blocked_on = dep.to_string(),
            }

            let now = Instant::now();
            let sleep_for = match deadline {
                Some(deadline) if now >= deadline => {
                    return Err(abandoned(AbandonReason::TimedOut, blocked_on, attempts, started));
                }
                Some(deadline) => backoff.min(deadline - now),
                None => backoff,
            };

            tracing::trace!(attempts, blocked_on = %blocked_on, ?sleep_for, "wait-set not yet satisfied");

            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {}
                _ = cancel.cancelled() => {}
            }

            backoff = backoff.saturating_mul(2).min(max_backoff);
        }
    }
}

impl Default for DependencyWaiter {
    fn default() -> Self {
        Self::new(WaitConfig::default())
    }
}

fn abandoned(
    reason: AbandonReason,
    blocked_on: String,
    attempts: u32,
    started: Instant,
) -> CausewayError {
    WaitError::Abandoned {
        reason,
        blocked_on,
        attempts,
        waited: started.elapsed(),
    }
    .into()
}
