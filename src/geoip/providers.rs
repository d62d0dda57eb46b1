//! Geolocation provider table.
//!
//! Each provider names its fields differently. The differences are bridged
//! here by one translation function per provider, so adding a provider is a
//! table entry and the resolver never branches on provider identity.

use serde_json::{Map, Value};

use crate::config::{IPAPI_CO_URL, IP_API_COM_URL};

use super::types::RawLocation;

/// Maps a provider's JSON object onto common field names.
pub type Translate = fn(&Map<String, Value>) -> RawLocation;

/// One external IP-geolocation service.
#[derive(Clone)]
pub struct GeoProvider {
    /// Name used in log lines
    pub name: &'static str,
    /// Endpoint queried with a single GET
    pub url: String,
    /// Field translation for this provider's response shape
    pub translate: Translate,
}

impl std::fmt::Debug for GeoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoProvider")
            .field("name", &self.name)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl GeoProvider {
    /// A provider queried at `url` whose body `translate` maps to common fields.
    pub fn new(name: &'static str, url: impl Into<String>, translate: Translate) -> Self {
        Self {
            name,
            url: url.into(),
            translate,
        }
    }

    /// ipapi.co at `url`.
    pub fn ipapi_co(url: impl Into<String>) -> Self {
        Self::new("ipapi.co", url, translate_ipapi_co)
    }

    /// ip-api.com at `url`.
    pub fn ip_api_com(url: impl Into<String>) -> Self {
        Self::new("ip-api.com", url, translate_ip_api_com)
    }
}

/// Providers in priority order.
pub fn default_providers() -> Vec<GeoProvider> {
    vec![
        GeoProvider::ipapi_co(IPAPI_CO_URL),
        GeoProvider::ip_api_com(IP_API_COM_URL),
    ]
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Some providers quote coordinates; "NaN" parses and is rejected by validation.
fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// ipapi.co: `ip`, `country_name`, `city`, `latitude`, `longitude`.
/// Errors come back as `{"error": true, "reason": ...}`.
pub fn translate_ipapi_co(object: &Map<String, Value>) -> RawLocation {
    if object.get("error").and_then(Value::as_bool) == Some(true) {
        return RawLocation::default();
    }
    RawLocation {
        ip: string_field(object, "ip"),
        country: string_field(object, "country_name"),
        city: string_field(object, "city"),
        latitude: number_field(object, "latitude"),
        longitude: number_field(object, "longitude"),
    }
}

/// ip-api.com: `query`, `country`, `city`, `lat`, `lon`.
/// Errors come back as `{"status": "fail", "message": ...}`.
pub fn translate_ip_api_com(object: &Map<String, Value>) -> RawLocation {
    if object.get("status").and_then(Value::as_str) == Some("fail") {
        return RawLocation::default();
    }
    RawLocation {
        ip: string_field(object, "query"),
        country: string_field(object, "country"),
        city: string_field(object, "city"),
        latitude: number_field(object, "lat"),
        longitude: number_field(object, "lon"),
    }
}
