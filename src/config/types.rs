//! Configuration types.
//!
//! This module defines the collector configuration and the logging enums used
//! by the command-line front end.

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::constants::{DEFAULT_LOCATION_TIMEOUT_MS, DEFAULT_PROVIDER_TIMEOUT_MS};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Options accepted by the metadata collector.
///
/// Deserializes from the camelCase option object (`includeLocation`,
/// `includeFingerprint`, `locationTimeout`), with timeouts in milliseconds.
///
/// # Examples
///
/// ```
/// use client_metadata::MetadataConfig;
///
/// let config = MetadataConfig {
///     include_location: true,
///     ..Default::default()
/// };
/// assert!(config.include_fingerprint);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataConfig {
    /// Resolve IP geolocation (off by default, it costs network round trips)
    pub include_location: bool,

    /// Generate a device fingerprint
    pub include_fingerprint: bool,

    /// Overall budget for the location lookup, in milliseconds
    #[serde(rename = "locationTimeout")]
    pub location_timeout_ms: u64,

    /// Per-provider request timeout, in milliseconds
    #[serde(rename = "providerTimeout")]
    pub provider_timeout_ms: u64,

    /// Include canvas, WebGL and font probes in the fingerprint
    pub comprehensive_fingerprint: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            include_location: false,
            include_fingerprint: true,
            location_timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            comprehensive_fingerprint: false,
        }
    }
}

impl MetadataConfig {
    /// Overall location budget as a `Duration`.
    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }

    /// Per-provider timeout as a `Duration`.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Checks that the configured timeouts are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroTimeout` if a timeout is zero while the
    /// feature it governs is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.include_location {
            if self.location_timeout_ms == 0 {
                return Err(ConfigError::ZeroTimeout("locationTimeout"));
            }
            if self.provider_timeout_ms == 0 {
                return Err(ConfigError::ZeroTimeout("providerTimeout"));
            }
        }
        Ok(())
    }
}
