//! Tracing subscriber setup
//!
//! Verbosity comes from `RUST_LOG` (e.g. `RUST_LOG=inventory=debug`),
//! defaulting to `info`.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Filter from `RUST_LOG`, or `info` when unset or unparsable
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global fmt subscriber; fails if one is already set
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true))
        .try_init()
        .context("failed to install tracing subscriber")
}
