//! Logging initialization for the console client.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for the console client.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the provided
/// default level. Safe to call once per process; later calls are no-ops.
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("console client started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
