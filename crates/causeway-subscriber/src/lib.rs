//! # causeway-subscriber
//!
//! Consumes dependency-tagged change messages from a broker and applies them
//! to a local store in causal order, exactly once, acknowledging only after a
//! durable outcome.
//!
//! ## Modules
//!
//! - [`message`]: Lazy, memoized parsing of one wire payload
//! - [`resolver`]: Happens-before wait-set construction and satisfaction check
//! - [`wait`]: Bounded-backoff, cancellable wait on a wait-set
//! - [`pipeline`]: Per-delivery state machine and outcome classification
//! - [`ack`]: Best-effort acknowledgment sink
//! - [`stats`]: Shared processing counters and latency window
//! - [`worker`]: Concurrent pipelines over a delivery channel
//! - [`events`]: Structured log events

pub mod ack;
pub mod events;
pub mod message;
pub mod pipeline;
pub mod resolver;
pub mod stats;
pub mod wait;
pub mod worker;

pub use ack::{AckKind, AckSink};
pub use message::{Dependencies, DependencyStatus, Message, ParsedPayload};
pub use pipeline::{CommitPipeline, Delivery, PipelineState, ProcessReport};
pub use stats::{StatsSnapshot, SubscriberStats};
pub use wait::{DependencyWaiter, WaitReport};
pub use worker::{SubscriberWorker, WorkerSummary};
