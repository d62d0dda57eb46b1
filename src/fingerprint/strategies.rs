//! Fingerprint strategies.
//!
//! The generator walks an ordered list of strategies and keeps the first
//! value one of them produces. [`TimestampStrategy`] terminates every list
//! and cannot fail.

use std::sync::Arc;

use crate::config::{FALLBACK_FINGERPRINT_PREFIX, FINGERPRINT_SEPARATOR, UNKNOWN};
use crate::environment::{Environment, ScreenInfo};
use crate::error_handling::{EnvironmentError, FingerprintError};

use super::hash::rolling_hash;
use super::probes::{canvas_probe, font_probe, webgl_probe};

/// Prefix of values produced by [`BasicStrategy`].
pub const BASIC_FINGERPRINT_PREFIX: &str = "basic_";

/// An external fingerprinting routine the generator can delegate to.
pub trait FingerprintLibrary: Send + Sync {
    /// Computes a fingerprint; `Ok(None)` means the library had nothing to offer.
    fn get_fingerprint(&self) -> Result<Option<String>, FingerprintError>;
}

/// One tier of the fallback ladder.
pub trait FingerprintStrategy: Send + Sync {
    /// Name used in log lines and degradation records.
    fn name(&self) -> &'static str;

    /// Produces a fingerprint or explains why it could not.
    fn attempt(
        &self,
        env: &dyn Environment,
        comprehensive: bool,
    ) -> Result<String, FingerprintError>;
}

/// Delegates to a [`FingerprintLibrary`].
pub struct LibraryStrategy {
    library: Arc<dyn FingerprintLibrary>,
}

impl LibraryStrategy {
    /// Wraps `library` as a fingerprint tier.
    pub fn new(library: Arc<dyn FingerprintLibrary>) -> Self {
        Self { library }
    }
}

impl FingerprintStrategy for LibraryStrategy {
    fn name(&self) -> &'static str {
        "library"
    }

    fn attempt(
        &self,
        _env: &dyn Environment,
        _comprehensive: bool,
    ) -> Result<String, FingerprintError> {
        match self.library.get_fingerprint()? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(FingerprintError::EmptyValue),
        }
    }
}

/// Hashes the full characteristic list; with `comprehensive` set it also
/// folds in the canvas, WebGL and font probes.
pub struct ComposedStrategy;

impl FingerprintStrategy for ComposedStrategy {
    fn name(&self) -> &'static str {
        "composed"
    }

    fn attempt(
        &self,
        env: &dyn Environment,
        comprehensive: bool,
    ) -> Result<String, FingerprintError> {
        let screen = characteristic(env.screen())?;
        let mut components = vec![
            characteristic(env.user_agent())?.unwrap_or_else(unknown),
            characteristic(env.language())?.unwrap_or_else(unknown),
            screen.map(resolution).unwrap_or_else(unknown),
            screen.map(|s| s.color_depth.to_string()).unwrap_or_else(unknown),
            display(env.timezone_offset_minutes())?,
            display(env.hardware_concurrency())?,
            display(env.max_touch_points())?,
        ];

        if comprehensive {
            components.push(canvas_probe(env));
            components.push(webgl_probe(env));
            components.push(font_probe(env));
        }

        Ok(rolling_hash(&components.join(FINGERPRINT_SEPARATOR)))
    }
}

/// Hashes the handful of characteristics nearly every host exposes.
pub struct BasicStrategy;

impl FingerprintStrategy for BasicStrategy {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn attempt(
        &self,
        env: &dyn Environment,
        _comprehensive: bool,
    ) -> Result<String, FingerprintError> {
        // The user agent is the one characteristic this tier cannot do without
        let components = [
            env.user_agent()?,
            characteristic(env.language())?.unwrap_or_else(unknown),
            characteristic(env.screen())?
                .map(resolution)
                .unwrap_or_else(unknown),
            display(env.timezone_offset_minutes())?,
        ];
        Ok(format!(
            "{}{}",
            BASIC_FINGERPRINT_PREFIX,
            rolling_hash(&components.join(FINGERPRINT_SEPARATOR))
        ))
    }
}

/// Last resort: `fallback_<hex milliseconds since epoch>`. Not stable across calls.
pub struct TimestampStrategy;

impl TimestampStrategy {
    /// A fresh `fallback_` token for the current instant.
    pub fn token() -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        format!("{}{:x}", FALLBACK_FINGERPRINT_PREFIX, millis)
    }
}

impl FingerprintStrategy for TimestampStrategy {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn attempt(
        &self,
        _env: &dyn Environment,
        _comprehensive: bool,
    ) -> Result<String, FingerprintError> {
        Ok(Self::token())
    }
}

/// An absent characteristic reads as `None`; a failed read is an error.
fn characteristic<T>(value: Result<T, EnvironmentError>) -> Result<Option<T>, FingerprintError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(EnvironmentError::Unavailable(what)) => {
            log::debug!("Fingerprint characteristic {} unavailable", what);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn display<T: ToString>(value: Result<T, EnvironmentError>) -> Result<String, FingerprintError> {
    Ok(characteristic(value)?
        .map(|v| v.to_string())
        .unwrap_or_else(unknown))
}

fn resolution(screen: ScreenInfo) -> String {
    format!("{}x{}", screen.width, screen.height)
}

fn unknown() -> String {
    UNKNOWN.to_string()
}
