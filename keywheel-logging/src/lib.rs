//! Structured logging setup for keywheel services

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Build the level filter: `RUST_LOG` wins, otherwise `default_level`
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install a JSON subscriber on stdout, one object per event with target,
/// file and line. Selected by `KEYWHEEL_LOG_FORMAT=json`.
///
/// Panics if a global subscriber is already set.
pub fn init_logging(service_name: &str, default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    tracing::info!(
        service = service_name,
        "Logging initialized"
    );
}

/// Install a human-readable subscriber, the default `KEYWHEEL_LOG_FORMAT`.
///
/// Writes to stderr so command output on stdout (e.g. `keypool-status`
/// JSON) stays machine-readable.
pub fn init_console_logging(service_name: &str, default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(
        service = service_name,
        "Console logging initialized"
    );
}
