//! Logging initialization and sanitized fault reporting.
//!
//! Sets up tracing-subscriber with an env-filtered fmt layer. All fault
//! logging goes through the bounded summarizer in [`summary`] and the
//! sanitizer in [`fault`], so no call site can leak unbounded or
//! secret-bearing payloads into the log stream.

pub mod fault;
pub mod summary;

use crate::error::{Error, Result};

/// Initialize logging (tracing-subscriber, env-filtered, fmt output).
///
/// # Errors
///
/// Returns an error if a global subscriber was already set.
pub fn init() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))?;

    Ok(())
}
