//! Tracing/logging setup shared by Warden processes.

pub mod config;
pub mod subscriber;

pub use config::{ConfigError, LogFormat, ObservabilityConfig};

/// Initialize process-wide tracing from the environment.
///
/// Safe to call multiple times; subsequent calls become no-ops. A malformed
/// `RUST_LOG` or `WARDEN_LOG_FORMAT` falls back to the defaults and is
/// reported once the subscriber is up.
pub fn init() {
    let result = ObservabilityConfig::from_env().and_then(|config| subscriber::init(&config));
    if let Err(err) = result {
        // The defaults always parse.
        let _ = subscriber::init(&ObservabilityConfig::default());
        tracing::warn!(error = %err, "invalid observability config, using defaults");
    }
}
