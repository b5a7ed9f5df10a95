//! Commit pipeline: the per-delivery state machine.
//!
//! ```text
//! Received ─▶ (WaitingOnDependencies) ─▶ Applying ─▶ Acknowledged
//!                                                 ├▶ AlreadyAcknowledged
//!                                                 └▶ Abandoned
//! ```
//!
//! A payload that fails to parse goes straight to `Abandoned`. Only
//! `Acknowledged` and `AlreadyAcknowledged` acknowledge the delivery;
//! everything else is left for broker redelivery.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use causeway_core::errors::{StoreError, TransportError};
use causeway_core::traits::{report_contained, BrokerHandle, CancellationToken, ErrorSink, LocalStore};
use causeway_core::{ApplyOutcome, CausewayConfig, CausewayError};

use crate::ack::{AckKind, AckSink};
use crate::events;
use crate::message::Message;
use crate::stats::SubscriberStats;
use crate::wait::{DependencyWaiter, WaitReport};

/// One broker delivery: the raw payload and its acknowledgment handle.
#[derive(Clone)]
pub struct Delivery {
    pub payload: String,
    pub handle: Arc<dyn BrokerHandle>,
}

impl Delivery {
    pub fn new(payload: impl Into<String>, handle: Arc<dyn BrokerHandle>) -> Self {
        Self {
            payload: payload.into(),
            handle,
        }
    }
}

impl fmt::Debug for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delivery")
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

/// States a delivery passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Received,
    WaitingOnDependencies,
    Applying,
    Acknowledged,
    AlreadyAcknowledged,
    Abandoned,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Acknowledged | Self::AlreadyAcknowledged | Self::Abandoned
        )
    }
}

/// What happened to one delivery.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub delivery_id: Uuid,
    /// Known once the payload parsed.
    pub endpoint: Option<String>,
    /// States entered, in order. The last one is terminal.
    pub transitions: Vec<PipelineState>,
    pub acknowledged: bool,
    /// Why the delivery was abandoned, if it was.
    pub error: Option<CausewayError>,
    /// A failed acknowledgment. Does not affect the final state.
    pub ack_error: Option<TransportError>,
    pub wait: Option<WaitReport>,
}

impl ProcessReport {
    fn new(delivery_id: Uuid) -> Self {
        Self {
            delivery_id,
            endpoint: None,
            transitions: Vec::new(),
            acknowledged: false,
            error: None,
            ack_error: None,
            wait: None,
        }
    }

    pub fn final_state(&self) -> PipelineState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(PipelineState::Received)
    }

    fn enter(&mut self, state: PipelineState) {
        self.transitions.push(state);
    }
}

/// Drives deliveries through parse, wait, apply and acknowledge.
///
/// One pipeline is shared by every worker; the store is the only
/// coordination point between concurrent deliveries.
pub struct CommitPipeline<S> {
    store: Arc<S>,
    config: CausewayConfig,
    waiter: DependencyWaiter,
    ack: AckSink,
    errors: Arc<dyn ErrorSink>,
    stats: Arc<SubscriberStats>,
}

impl<S: LocalStore> CommitPipeline<S> {
    pub fn new(store: Arc<S>, config: CausewayConfig, errors: Arc<dyn ErrorSink>) -> Self {
        let stats = Arc::new(SubscriberStats::new(&config.stats));
        Self {
            ack: AckSink::new(Arc::clone(&stats), Arc::clone(&errors)),
            waiter: DependencyWaiter::new(config.wait.clone()),
            store,
            config,
            errors,
            stats,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &CausewayConfig {
        &self.config
    }

    pub fn stats(&self) -> &Arc<SubscriberStats> {
        &self.stats
    }

    /// Process one delivery to a terminal state.
    ///
    /// Never fails: every error is classified into the report.
    pub async fn process(&self, delivery: Delivery, cancel: &CancellationToken) -> ProcessReport {
        let message = Message::new(delivery.payload, &self.config.subscriber);
        let span = causeway_core::process_span!(message.id());
        self.run(&message, delivery.handle.as_ref(), cancel)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        message: &Message,
        handle: &dyn BrokerHandle,
        cancel: &CancellationToken,
    ) -> ProcessReport {
        let mut report = ProcessReport::new(message.id());
        self.stats.record_received();

        let (parsed, status, wait_set) =
            match (message.parsed(), message.dependency_status(), message.happens_before()) {
                (Ok(parsed), Ok(status), Ok(wait_set)) => (parsed, status, wait_set),
                (Err(error), _, _) | (_, Err(error), _) | (_, _, Err(error)) => {
                    events::malformed_payload(&message.id().to_string(), &error);
                    self.stats.record_malformed();
                    let error = CausewayError::Payload(error);
                    self.report(&error, message);
                    report.error = Some(error);
                    report.enter(PipelineState::Abandoned);
                    return report;
                }
            };
        report.endpoint = Some(parsed.endpoint.clone());
        report.enter(PipelineState::Received);

        if status.requires_wait() {
            report.enter(PipelineState::WaitingOnDependencies);
            events::waiting_on_dependencies(&parsed.endpoint, wait_set.len());
            let waited = self
                .waiter
                .wait_until_satisfied(wait_set, self.store.as_ref(), cancel)
                .instrument(causeway_core::wait_span!(parsed.endpoint, wait_set.len()))
                .await;
            match waited {
                Ok(wait) => report.wait = Some(wait),
                Err(error) => {
                    match &error {
                        CausewayError::Wait(wait_error) => {
                            events::wait_abandoned(&parsed.endpoint, wait_error);
                            self.stats.record_abandoned();
                        }
                        _ => {
                            self.stats.record_failed();
                            self.report(&error, message);
                        }
                    }
                    report.error = Some(error);
                    report.enter(PipelineState::Abandoned);
                    return report;
                }
            }
        }

        report.enter(PipelineState::Applying);
        let outcome = {
            let _span = causeway_core::apply_span!(parsed.endpoint).entered();
            let change = parsed.change();
            catch_unwind(AssertUnwindSafe(|| {
                self.store
                    .with_unit_of_work(&parsed.endpoint, |store| store.apply(&change))
            }))
            .unwrap_or_else(|_| {
                ApplyOutcome::Failed(StoreError::backend("local store panicked during apply"))
            })
        };

        let kind = match outcome {
            ApplyOutcome::Applied => {
                self.stats.record_applied();
                events::change_applied(&parsed.endpoint, parsed.timestamp);
                report.enter(PipelineState::Acknowledged);
                AckKind::Applied
            }
            ApplyOutcome::AlreadyApplied { write } => {
                self.stats.record_duplicate();
                events::already_applied(&parsed.endpoint, &write.to_string());
                report.enter(PipelineState::AlreadyAcknowledged);
                AckKind::Duplicate
            }
            ApplyOutcome::Failed(store_error) => {
                self.stats.record_failed();
                events::apply_failed(&parsed.endpoint, &store_error);
                let error = CausewayError::Store(store_error);
                self.report(&error, message);
                report.error = Some(error);
                report.enter(PipelineState::Abandoned);
                return report;
            }
        };

        match self.ack.acknowledge(handle, message, kind) {
            Ok(()) => report.acknowledged = true,
            Err(error) => report.ack_error = Some(error),
        }
        report
    }

    fn report(&self, error: &CausewayError, message: &Message) {
        report_contained(self.errors.as_ref(), error, &message.error_context());
    }
}
