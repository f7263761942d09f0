// src/logging.rs
// =============================================================================
// Logging setup using tracing.
//
// Log lines go to stderr so the Markdown written to stdout stays clean.
// Filter precedence: RUST_LOG (if set) > --verbose (debug) > LOG_LEVEL.
// =============================================================================

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{EditorialError, Result};

// Initialize the global tracing subscriber
//
// Parameters:
//   verbose: the -v flag, forces debug output for this crate
//   default_level: LOG_LEVEL from settings (e.g. "warn", "info")
pub fn init(verbose: bool, default_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, default_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .try_init()
        .map_err(|e| EditorialError::Config(format!("Failed to initialize logging: {}", e)))
}

// Verbose mode only turns up our own crate; dependencies like html5ever
// and headless_chrome are very chatty at debug level.
fn filter_directive(verbose: bool, default_level: &str) -> String {
    if verbose {
        "warn,codeforces_editorial=debug".to_string()
    } else {
        default_level.to_lowercase()
    }
}
