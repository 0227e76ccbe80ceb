//! Tracing initialization for chordmon.
//!
//! Logs go to stderr so stdout carries only results.

use tracing_subscriber::EnvFilter;

/// Build the filter from a directive string, falling back to `warn`.
pub fn filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log level {:?}: {}", log_level, e);
        EnvFilter::new("warn")
    })
}

pub fn init(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
