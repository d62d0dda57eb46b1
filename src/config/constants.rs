//! Configuration constants.
//!
//! This module defines the timeouts, provider endpoints, and fingerprint probe
//! parameters used throughout the crate.

use std::time::Duration;

/// Overall budget for a location lookup started by the collector, in milliseconds.
pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 2000;
/// Default overall location budget as a `Duration`.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_millis(DEFAULT_LOCATION_TIMEOUT_MS);

/// Per-provider request timeout in milliseconds.
/// A single slow provider must not eat the whole overall budget, so this is
/// kept independent of `DEFAULT_LOCATION_TIMEOUT_MS`.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 3000;
/// Default per-provider timeout as a `Duration`.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS);

/// Primary geolocation endpoint (HTTPS).
pub const IPAPI_CO_URL: &str = "https://ipapi.co/json/";
/// Fallback geolocation endpoint. Plain HTTP on purpose: the free tier does
/// not serve HTTPS.
pub const IP_API_COM_URL: &str = "http://ip-api.com/json/";

/// Value sent in the `Accept` header of every provider request.
pub const ACCEPT_JSON: &str = "application/json";
/// Identifying client header sent to providers.
pub const CLIENT_USER_AGENT: &str = concat!("client_metadata/", env!("CARGO_PKG_VERSION"));

/// Sentinel used when no platform or browser pattern matches.
pub const UNKNOWN: &str = "Unknown";

/// Separator between characteristics in the fingerprint input string.
pub const FINGERPRINT_SEPARATOR: &str = "|";
/// Prefix of the last-resort, timestamp-derived fingerprint.
pub const FALLBACK_FINGERPRINT_PREFIX: &str = "fallback_";

/// Text rendered by the font availability probe.
/// Wide and narrow glyphs together make width differences between fonts visible.
pub const FONT_PROBE_TEXT: &str = "mmmmmmmmmmlli";
/// Generic families every font is measured against.
pub const BASELINE_FONTS: &[&str] = &["monospace", "sans-serif", "serif"];
/// Candidate fonts checked by the font availability probe.
pub const PROBE_FONTS: &[&str] = &[
    "Arial",
    "Arial Black",
    "Calibri",
    "Cambria",
    "Comic Sans MS",
    "Consolas",
    "Courier New",
    "Georgia",
    "Helvetica",
    "Impact",
    "Lucida Console",
    "Palatino",
    "Segoe UI",
    "Tahoma",
    "Times New Roman",
    "Trebuchet MS",
    "Verdana",
];
