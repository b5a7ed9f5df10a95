//! Stable error codes for error sinks and structured logs.

/// Every error enum implements this to expose a machine-readable code.
pub trait CausewayErrorCode {
    /// Returns the error code string (e.g., "MALFORMED_PAYLOAD").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const MALFORMED_PAYLOAD: &str = "MALFORMED_PAYLOAD";
pub const DEPENDENCY_WAIT_ABANDONED: &str = "DEPENDENCY_WAIT_ABANDONED";
pub const APPLY_CONFLICT: &str = "APPLY_CONFLICT";
pub const STORE_ERROR: &str = "STORE_ERROR";
pub const ACK_TRANSPORT_ERROR: &str = "ACK_TRANSPORT_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
