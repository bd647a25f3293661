//! Structured logging init, `tracing`-based.

use tracing_subscriber::{EnvFilter, prelude::*};

/// Initialize the global tracing subscriber. Safe to call more than once
/// (subsequent calls are no-ops); `verbose` enables debug-level spans for
/// the engine's own crate.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "gcr_sim=debug" } else { "gcr_sim=info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    // A run may construct more than one Simulation (Monte-Carlo ensemble);
    // only the first caller actually installs the subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
