//! Tracing/logging initialization.
//!
//! Logs are JSON lines on stderr so that stdout stays free for command output.

use tracing_subscriber::EnvFilter;

/// Initialize tracing with `default_filter` unless `RUST_LOG` is set.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_with_default("debug");
        init_with_default("info");
        ::tracing::info!("still logging after second init");
    }
}
