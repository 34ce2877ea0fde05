//! Logging setup utilities for the Hiroba chat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose logs are enabled at the default level.
const WORKSPACE_CRATES: [&str; 3] = ["hiroba_server", "hiroba_shared", "tower_http"];

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// # Examples
///
/// ```
/// use hiroba_shared::logger::default_filter;
///
/// let filter = default_filter("hiroba-server", "info");
/// assert!(filter.contains("hiroba_server=info"));
/// ```
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary = binary_name.replace('-', "_");
    WORKSPACE_CRATES
        .iter()
        .copied()
        .chain(std::iter::once(binary.as_str()))
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "hiroba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger("hiroba-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
