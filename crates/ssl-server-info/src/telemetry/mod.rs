//! Structured logging setup.
//!
//! JSON lines on stdout via [`tracing_subscriber`]. The filter comes from
//! `RUST_LOG` when set and falls back to [`DEFAULT_LOG_FILTER`].

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is absent or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialise the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
