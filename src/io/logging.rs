//! Structured logging setup for the command-line driver

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set
pub const fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install a stderr subscriber; `RUST_LOG` takes precedence over the flags
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(quiet: bool, verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
