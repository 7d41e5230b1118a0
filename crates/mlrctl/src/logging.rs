//! Logging setup for mlrctl
//!
//! Priority: `RUST_LOG`, then `--verbose` (debug), then the config level.
//! Output goes to stderr so `--json` stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn fallback_filter(verbose: bool, config_level: &str) -> String {
    if verbose {
        "debug".to_string()
    } else if config_level.trim().is_empty() {
        "warn".to_string()
    } else {
        config_level.trim().to_lowercase()
    }
}

pub fn init(verbose: bool, config_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_filter(verbose, config_level)));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
