//! Wire-format field names and compiled defaults.

/// Default name of the payload field carrying the routing endpoint.
pub const DEFAULT_ENDPOINT_FIELD: &str = "__amqp__";

/// Payload field carrying the producer-side epoch seconds.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Payload field carrying the optional dependency block.
pub const DEPENDENCIES_FIELD: &str = "dependencies";

/// Key of the read list inside the dependency block.
pub const READ_FIELD: &str = "read";

/// Key of the write list inside the dependency block.
pub const WRITE_FIELD: &str = "write";

/// Separator between key and version in a dependency token.
pub const DEPENDENCY_SEPARATOR: char = ':';

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "CAUSEWAY_LOG";

/// Default worker count.
pub const DEFAULT_WORKERS: usize = 4;

/// Default initial backoff between wait-set evaluations, in milliseconds.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 10;

/// Default backoff ceiling, in milliseconds.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 1_000;

/// Default wait timeout, in seconds. A stuck wait is abandoned for redelivery.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 30;

/// Default number of latency samples retained by the stats sink.
pub const DEFAULT_LATENCY_WINDOW: usize = 10_000;
