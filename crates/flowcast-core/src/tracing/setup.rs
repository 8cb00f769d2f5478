//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Flowcast tracing/logging system.
///
/// Reads the `FLOWCAST_LOG` environment variable for per-module log levels.
/// Format: `FLOWCAST_LOG=flowcast_analysis::graph=debug,flowcast_analysis::forecast=warn`
///
/// Falls back to `flowcast=info` if `FLOWCAST_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FLOWCAST_LOG")
            .unwrap_or_else(|_| EnvFilter::new("flowcast=info"));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
