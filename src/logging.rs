//! Diagnostic output.
//!
//! The runtime emits `tracing` events (route changes, skipped attributes,
//! render failures) but never installs a subscriber by itself. Hosts that do
//! not bring their own call [`init`] once at startup.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the filter directives, e.g.
/// `RILL_LOG=rill_router=debug,info`.
pub const FILTER_ENV: &str = "RILL_LOG";

const DEFAULT_FILTER: &str = "info";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a formatting subscriber on stderr (idempotent).
///
/// Directives are read from `RILL_LOG`, then `RUST_LOG`, falling back to
/// `info`. If another global subscriber is already installed this only
/// reports the conflict on stderr.
pub fn init() {
    TRACING_INSTALLED.call_once(|| {
        let result = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(env_filter()),
            )
            .try_init();

        if result.is_err() {
            eprintln!("rill: a global tracing subscriber is already installed");
        }
    });
}

/// The filter [`init`] installs.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
