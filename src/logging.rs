//! Structured logging setup.
//!
//! Events go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over the configured directive.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| anyhow!("invalid log filter '{}': {}", default_directive, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
