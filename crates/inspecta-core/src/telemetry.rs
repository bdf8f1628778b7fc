//! Tracing setup for binaries and tests

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Logs go to stderr so command
/// output on stdout stays machine-readable.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init_tracing(json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
