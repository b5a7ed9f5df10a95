//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the Causeway tracing/logging system.
///
/// Reads the `CAUSEWAY_LOG` environment variable for per-module log levels.
/// Format: `CAUSEWAY_LOG=causeway_subscriber=debug,causeway_storage=warn`
///
/// Falls back to `causeway=info` if `CAUSEWAY_LOG` is not set or is invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("causeway=info"));
    install(filter);
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        let result = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init();
        // Another global subscriber (e.g. a host test harness) wins.
        let _ = result;
    });
}
