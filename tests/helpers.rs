// Shared test helpers for geolocation mock servers and environments.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::time::Duration;

use client_metadata::{GeoProvider, GeolocationResolver, StaticEnvironment};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// ipapi.co shaped success body.
#[allow(dead_code)]
pub fn ipapi_co_body() -> Value {
    json!({
        "ip": "203.0.113.7",
        "city": "Oslo",
        "region": "Oslo",
        "country": "NO",
        "country_name": "Norway",
        "latitude": 59.9127,
        "longitude": 10.7461
    })
}

/// ip-api.com shaped success body.
#[allow(dead_code)]
pub fn ip_api_com_body() -> Value {
    json!({
        "status": "success",
        "country": "Germany",
        "countryCode": "DE",
        "city": "Berlin",
        "lat": 52.52,
        "lon": 13.405,
        "query": "198.51.100.1"
    })
}

/// Mounts a GET /json/ mock that must be called exactly `calls` times.
#[allow(dead_code)]
pub async fn mount_provider(server: &MockServer, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/json/"))
        .and(header("accept", "application/json"))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

/// Resolver over an ipapi.co mock followed by an ip-api.com mock.
#[allow(dead_code)]
pub fn resolver_for(
    primary: &MockServer,
    fallback: &MockServer,
    provider_timeout: Duration,
) -> GeolocationResolver {
    GeolocationResolver::new(reqwest::Client::new())
        .with_providers(vec![
            GeoProvider::ipapi_co(format!("{}/json/", primary.uri())),
            GeoProvider::ip_api_com(format!("{}/json/", fallback.uri())),
        ])
        .with_provider_timeout(provider_timeout)
}

/// A fully populated desktop environment with networking.
#[allow(dead_code)]
pub fn desktop_environment() -> StaticEnvironment {
    StaticEnvironment::new(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36 Edg/125.0.0.0",
    )
    .with_language("en-GB")
    .with_screen(2560, 1440, 30)
    .with_timezone_offset(0)
    .with_hardware(16, 0)
    .with_networking(true)
}
