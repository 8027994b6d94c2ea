//! Console logging setup
//!
//! Everything is written to stderr, so that CSV or JSON written to stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Initialize logging. The level defaults to INFO (DEBUG if `verbose`), and can be overridden
/// with `RUST_LOG`
pub fn init_logging(verbose: bool) {
    let default_filter = match verbose {
        true => "debug",
        false => "info",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
