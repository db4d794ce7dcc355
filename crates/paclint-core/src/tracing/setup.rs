//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "PACLINT_LOG";

/// Filter used when `PACLINT_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "paclint=info";

/// Initialize the paclint tracing/logging system.
///
/// Reads `PACLINT_LOG` for per-subsystem log levels, e.g.
/// `PACLINT_LOG=paclint_analysis=debug,paclint_storage=warn`.
/// Falls back to `paclint=info`.
///
/// Idempotent; a subscriber installed by the host takes precedence.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

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
