//! Environment-driven observability configuration.
//!
//! - `RUST_LOG`: `EnvFilter` directives (default `info`).
//! - `WARDEN_LOG_FORMAT`: `json` (default), `pretty` or `compact`.

use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const FILTER_VAR: &str = "RUST_LOG";
pub const FORMAT_VAR: &str = "WARDEN_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: unknown log format `{value}` (expected json, pretty or compact)")]
    UnknownFormat { var: &'static str, value: String },

    #[error("{var}: invalid filter `{value}`: {reason}")]
    InvalidFilter {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::UnknownFormat {
                var: FORMAT_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl ObservabilityConfig {
    /// Parse `filter` into the directive set the subscriber installs.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.filter).map_err(|e| ConfigError::InvalidFilter {
            var: FILTER_VAR,
            value: self.filter.clone(),
            reason: e.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let set = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let filter = set(FILTER_VAR).unwrap_or(defaults.filter);
        let format = match set(FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => defaults.format,
        };

        let config = Self { filter, format };
        config.env_filter()?;
        Ok(config)
    }
}
