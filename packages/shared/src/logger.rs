//! Logging setup for the Sharepad binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the Sharepad library crates and the binary itself.
/// `RUST_LOG` overrides the default when it is set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "sharepad-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use sharepad_shared::logger::setup_logger;
///
/// setup_logger("sharepad-server", "debug");
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

fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    [
        "sharepad_shared",
        "sharepad_server",
        "sharepad_client",
        &binary_name.replace('-', "_"),
        "tower_http",
    ]
    .iter()
    .map(|target| format!("{}={}", target, default_log_level))
    .collect::<Vec<_>>()
    .join(",")
}
