//! Shared processing statistics.
//!
//! One `SubscriberStats` is shared by every pipeline. Counters are atomic,
//! per-endpoint counts live in a `DashMap`, and end-to-end latency samples
//! go into a bounded, mutex-guarded window.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use causeway_core::config::StatsConfig;

use crate::message::Message;

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub received: u64,
    pub applied: u64,
    pub duplicates: u64,
    pub failed: u64,
    pub malformed: u64,
    pub abandoned: u64,
    pub acknowledged: u64,
    pub ack_failures: u64,
    /// Successful acknowledgments per endpoint.
    pub per_endpoint: BTreeMap<String, u64>,
    pub latency_samples: usize,
    /// Mean end-to-end latency in seconds over the retained window.
    pub average_latency_secs: Option<f64>,
}

/// Counters shared across concurrent pipelines.
#[derive(Debug)]
pub struct SubscriberStats {
    received: AtomicU64,
    applied: AtomicU64,
    duplicates: AtomicU64,
    failed: AtomicU64,
    malformed: AtomicU64,
    abandoned: AtomicU64,
    acknowledged: AtomicU64,
    ack_failures: AtomicU64,
    per_endpoint: DashMap<String, u64>,
    latencies: Mutex<VecDeque<u64>>,
    window: usize,
}

impl SubscriberStats {
    pub fn new(config: &StatsConfig) -> Self {
        Self {
            received: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
            abandoned: AtomicU64::new(0),
            acknowledged: AtomicU64::new(0),
            ack_failures: AtomicU64::new(0),
            per_endpoint: DashMap::new(),
            latencies: Mutex::new(VecDeque::new()),
            window: config.latency_window.max(1),
        }
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_applied(&self) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ack_failure(&self) {
        self.ack_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully acknowledged message.
    ///
    /// Latency is `acked_at - producer timestamp` in whole seconds, clamped
    /// at zero for producers with skewed clocks.
    pub fn notify_processed_message(&self, message: &Message, acked_at: DateTime<Utc>) {
        self.acknowledged.fetch_add(1, Ordering::Relaxed);

        let Ok(parsed) = message.parsed() else {
            return;
        };
        *self.per_endpoint.entry(parsed.endpoint.clone()).or_insert(0) += 1;

        let latency = acked_at.timestamp().saturating_sub(parsed.timestamp).max(0) as u64;
        let mut window = self.latency_window();
        if window.len() >= self.window {
            window.pop_front();
        }
        window.push_back(latency);
    }

    /// Mean latency in seconds over the retained samples.
    pub fn average_latency(&self) -> Option<f64> {
        let window = self.latency_window();
        if window.is_empty() {
            return None;
        }
        let sum: u64 = window.iter().sum();
        Some(sum as f64 / window.len() as f64)
    }

    pub fn processed_for(&self, endpoint: &str) -> u64 {
        self.per_endpoint.get(endpoint).map(|c| *c).unwrap_or(0)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let (latency_samples, average_latency_secs) = {
            let window = self.latency_window();
            let len = window.len();
            let avg = (len > 0).then(|| window.iter().sum::<u64>() as f64 / len as f64);
            (len, avg)
        };

        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            acknowledged: self.acknowledged.load(Ordering::Relaxed),
            ack_failures: self.ack_failures.load(Ordering::Relaxed),
            per_endpoint: self
                .per_endpoint
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
            latency_samples,
            average_latency_secs,
        }
    }

    // A panic while holding the lock leaves the samples usable.
    fn latency_window(&self) -> MutexGuard<'_, VecDeque<u64>> {
        self.latencies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SubscriberStats {
    fn default() -> Self {
        Self::new(&StatsConfig::default())
    }
}
