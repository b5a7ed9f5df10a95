//! Worker pool over a delivery channel.
//!
//! Each worker takes one delivery at a time from the shared receiver and
//! drives it through the shared pipeline. Workers run concurrently as tokio
//! tasks and stop when the channel closes or the token is cancelled.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use causeway_core::traits::{CancellationToken, LocalStore};

use crate::events;
use crate::pipeline::{CommitPipeline, Delivery, PipelineState, ProcessReport};

/// Per-state counts over everything the pool processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    pub processed: u64,
    pub acknowledged: u64,
    pub already_acknowledged: u64,
    pub abandoned: u64,
    pub ack_failures: u64,
}

impl WorkerSummary {
    pub fn record(&mut self, report: &ProcessReport) {
        self.processed += 1;
        match report.final_state() {
            PipelineState::Acknowledged => self.acknowledged += 1,
            PipelineState::AlreadyAcknowledged => self.already_acknowledged += 1,
            PipelineState::Abandoned => self.abandoned += 1,
            PipelineState::Received
            | PipelineState::WaitingOnDependencies
            | PipelineState::Applying => {}
        }
        if report.ack_error.is_some() {
            self.ack_failures += 1;
        }
    }

    pub fn merge(&mut self, other: WorkerSummary) {
        self.processed += other.processed;
        self.acknowledged += other.acknowledged;
        self.already_acknowledged += other.already_acknowledged;
        self.abandoned += other.abandoned;
        self.ack_failures += other.ack_failures;
    }
}

/// Runs `workers` concurrent pipelines.
pub struct SubscriberWorker<S> {
    pipeline: Arc<CommitPipeline<S>>,
    workers: usize,
}

impl<S: LocalStore + 'static> SubscriberWorker<S> {
    /// Worker count comes from `subscriber.workers`.
    pub fn new(pipeline: Arc<CommitPipeline<S>>) -> Self {
        let workers = pipeline.config().subscriber.workers.max(1);
        Self { pipeline, workers }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Consume deliveries until the channel closes or `cancel` fires.
    ///
    /// A delivery already being processed when `cancel` fires finishes its
    /// current step; waits abandon without acknowledging.
    pub async fn run(
        &self,
        receiver: mpsc::Receiver<Delivery>,
        cancel: CancellationToken,
    ) -> WorkerSummary {
        let receiver = Arc::new(Mutex::new(receiver));
        let mut tasks = JoinSet::new();
        for worker_id in 0..self.workers {
            tasks.spawn(worker_loop(
                worker_id,
                Arc::clone(&self.pipeline),
                Arc::clone(&receiver),
                cancel.clone(),
            ));
        }

        let mut summary = WorkerSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(partial) => summary.merge(partial),
                Err(e) => tracing::warn!(error = %e, "subscriber worker task failed"),
            }
        }
        events::workers_stopped(self.workers, summary.processed);
        summary
    }
}

async fn worker_loop<S: LocalStore + 'static>(
    worker_id: usize,
    pipeline: Arc<CommitPipeline<S>>,
    receiver: Arc<Mutex<mpsc::Receiver<Delivery>>>,
    cancel: CancellationToken,
) -> WorkerSummary {
    let mut summary = WorkerSummary::default();
    loop {
        let next = {
            let mut receiver = receiver.lock().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                delivery = receiver.recv() => delivery,
            }
        };
        let Some(delivery) = next else {
            break;
        };

        let report = pipeline.process(delivery, &cancel).await;
        tracing::trace!(worker_id, state = ?report.final_state(), "delivery processed");
        summary.record(&report);
    }
    summary
}
