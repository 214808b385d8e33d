// crates/peer-cli/src/logging.rs
// ============================================================================
// Module: Logging Setup
// Description: Tracing subscriber initialization for the peer binary.
// Purpose: Route library diagnostics to stderr with an env-controlled filter.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! Diagnostics go to stderr so stdout stays reserved for command output. The
//! filter comes from `PEER_LOG` (same syntax as `RUST_LOG`) and defaults to
//! `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "PEER_LOG";
/// Filter used when `PEER_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Builds the log filter from `PEER_LOG`, falling back to `warn`.
#[must_use]
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global stderr subscriber. Later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
