//! Error type definitions.
//!
//! This module defines all error types used throughout the crate.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Invalid collector configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A timeout that governs an enabled feature is zero.
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Failure reading a value from the runtime environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    /// The environment does not expose this characteristic at all.
    #[error("{0} is not available in this environment")]
    Unavailable(&'static str),

    /// Reading the characteristic failed.
    #[error("reading {what} failed: {reason}")]
    Probe {
        /// Name of the characteristic being read
        what: &'static str,
        /// Underlying failure description
        reason: String,
    },
}

/// The user-agent classifier could not run.
///
/// This is the only failure that aborts a metadata collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// The environment refused to supply a user-agent string.
    #[error("user agent unavailable: {0}")]
    UserAgentUnavailable(#[from] EnvironmentError),
}

/// Error types for fingerprint strategies and sources.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// Reading a characteristic from the environment failed.
    #[error("environment error: {0}")]
    Environment(#[from] EnvironmentError),

    /// A strategy produced an empty or missing value.
    #[error("fingerprint strategy produced no value")]
    EmptyValue,

    /// The delegated fingerprinting library failed.
    #[error("fingerprint library failed: {0}")]
    Library(String),
}

/// A single failed geolocation provider attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The request was cancelled because the per-provider timer fired.
    #[error("request aborted after {}ms timeout", .0.as_millis())]
    Timeout(Duration),

    /// The provider answered with a non-success status.
    #[error("HTTP {0}")]
    Http(u16),

    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The body was not a JSON object.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// The translated record lacks a country or city.
    #[error("response is missing country or city")]
    MissingFields,

    /// Coordinates were present but not finite or out of range.
    #[error("coordinates are non-finite or out of range")]
    InvalidCoordinates,

    /// A failure that does not fit any other category.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Failure categories for provider attempts, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ProviderFailureKind {
    /// No answer within the per-provider timeout
    Timeout,
    /// Non-success HTTP status
    HttpError,
    /// Connection or transport failure
    NetworkError,
    /// Body was not the expected JSON
    MalformedBody,
    /// Country or city missing
    MissingFields,
    /// Coordinates missing their pair, non-finite, or out of range
    InvalidCoordinates,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ProviderFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderFailureKind {
    /// Short label used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFailureKind::Timeout => "timeout",
            ProviderFailureKind::HttpError => "http error",
            ProviderFailureKind::NetworkError => "network error",
            ProviderFailureKind::MalformedBody => "malformed body",
            ProviderFailureKind::MissingFields => "missing fields",
            ProviderFailureKind::InvalidCoordinates => "invalid coordinates",
            ProviderFailureKind::Unknown => "unknown",
        }
    }
}

impl ProviderError {
    /// The category this failure is reported under.
    pub fn kind(&self) -> ProviderFailureKind {
        match self {
            ProviderError::Timeout(_) => ProviderFailureKind::Timeout,
            ProviderError::Http(_) => ProviderFailureKind::HttpError,
            ProviderError::Network(_) => ProviderFailureKind::NetworkError,
            ProviderError::MalformedBody(_) => ProviderFailureKind::MalformedBody,
            ProviderError::MissingFields => ProviderFailureKind::MissingFields,
            ProviderError::InvalidCoordinates => ProviderFailureKind::InvalidCoordinates,
            ProviderError::Unknown(_) => ProviderFailureKind::Unknown,
        }
    }
}
