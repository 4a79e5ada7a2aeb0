//! Logging setup for the demo host.

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info` for everything and
/// `debug` for the eternity crates. `log` records from the library crates are
/// forwarded through the `tracing-log` bridge.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,eternity=debug,eternity_core=debug,eternity_utils=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
