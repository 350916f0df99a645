//! Tracing initialization
//!
//! The observability sink is plain leveled log lines; the consuming pipeline
//! captures stdout. `RUST_LOG` overrides the environment-derived default.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Initialize the global tracing subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing(environment: Environment) {
    let default_directive = match environment {
        Environment::Development => "debug",
        Environment::Production => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
