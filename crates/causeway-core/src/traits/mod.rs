//! Capability traits the subscriber consumes.
//!
//! - [`LocalStore`]: version lookup and atomic compare-and-apply
//! - [`BrokerHandle`]: acknowledgment of one delivery
//! - [`ErrorSink`]: fire-and-forget error reporting
//! - [`Cancellable`]: cooperative abandon signal for dependency waits

pub mod broker;
pub mod cancellation;
pub mod error_sink;
pub mod local_store;

pub use broker::BrokerHandle;
pub use cancellation::{Cancellable, CancellationToken};
pub use error_sink::{report_contained, ErrorSink, NoopErrorSink, TracingErrorSink};
pub use local_store::LocalStore;
