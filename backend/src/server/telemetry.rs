//! Structured JSON logging shared by both binaries.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Build the filter from `RUST_LOG`, falling back to `default_level`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global JSON subscriber. A second call is a logged no-op.
pub fn init_tracing(default_level: &str) {
    if let Err(e) = fmt()
        .with_env_filter(env_filter(default_level))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
