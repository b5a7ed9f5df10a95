//! ErrorSink: where failures are reported.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::errors::{CausewayError, CausewayErrorCode};
use crate::models::ErrorContext;

/// Fire-and-forget error reporting.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &CausewayError, context: &ErrorContext);
}

/// Report through `sink`, containing any panic raised by the sink.
///
/// Returns false when the sink panicked.
pub fn report_contained(sink: &dyn ErrorSink, error: &CausewayError, context: &ErrorContext) -> bool {
    let result = catch_unwind(AssertUnwindSafe(|| sink.report(error, context)));
    if result.is_err() {
        tracing::warn!(
            code = error.error_code(),
            delivery_id = %context.delivery_id,
            "error sink panicked while reporting"
        );
    }
    result.is_ok()
}

/// Logs every report at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, error: &CausewayError, context: &ErrorContext) {
        tracing::warn!(
            code = error.error_code(),
            endpoint = context.endpoint.as_deref().unwrap_or("<unknown>"),
            delivery_id = %context.delivery_id,
            error = %error,
            "subscriber error"
        );
    }
}

/// Drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopErrorSink;

impl ErrorSink for NoopErrorSink {
    fn report(&self, _error: &CausewayError, _context: &ErrorContext) {}
}
