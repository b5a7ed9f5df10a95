//! Span names and structured field names used across the subscriber.

/// Create the per-delivery processing span.
#[macro_export]
macro_rules! process_span {
    ($delivery_id:expr) => {
        tracing::info_span!("causeway.process", delivery_id = %$delivery_id)
    };
}

/// Create the dependency wait span.
#[macro_export]
macro_rules! wait_span {
    ($endpoint:expr, $wait_set_len:expr) => {
        tracing::debug_span!("causeway.wait", endpoint = %$endpoint, wait_set = $wait_set_len)
    };
}

/// Create the store apply span.
#[macro_export]
macro_rules! apply_span {
    ($endpoint:expr) => {
        tracing::debug_span!("causeway.apply", endpoint = %$endpoint)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const PROCESS: &str = "causeway.process";
    pub const WAIT: &str = "causeway.wait";
    pub const APPLY: &str = "causeway.apply";
}

