//! Logging setup
//!
//! Installs a `tracing` subscriber for hosts embedding the cache engine.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "deep_pockets=info";

/// Initializes a fmt subscriber with an env filter.
///
/// Defaults to "info" level for this crate, can be overridden with the
/// `RUST_LOG` env var. Returns false if a global subscriber was already set.
pub fn init() -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
