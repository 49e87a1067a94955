//! Bootstrap utilities for recall binaries.
//!
//! `recall-demo` calls [`init_tracing`] before connecting to the store, so
//! cache and advice events are logged from the first command on.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the RECALL_LOG environment variable.
///
/// Defaults to "info" level if RECALL_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
