//! Provider-sequence resolution.
//!
//! Providers are tried strictly one after another in priority order; the
//! first valid record wins and later providers are never contacted. Every
//! failure is logged and recorded, never returned as an error.

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;

use crate::config::{ACCEPT_JSON, CLIENT_USER_AGENT, DEFAULT_PROVIDER_TIMEOUT};
use crate::environment::Environment;
use crate::error_handling::{categorize_reqwest_error, ProviderError};

use super::providers::{default_providers, GeoProvider};
use super::types::LocationRecord;

/// A provider attempt that did not produce a valid record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    /// Name of the provider
    pub provider: &'static str,
    /// Why the attempt failed
    pub error: ProviderError,
}

/// Outcome of walking the provider list once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationResolution {
    /// First valid record, if any provider produced one
    pub location: Option<LocationRecord>,
    /// Failed attempts in the order they were made
    pub failures: Vec<ProviderFailure>,
}

/// Resolves the caller's location from IP-geolocation providers.
///
/// Holds no per-call state; concurrent lookups on one resolver are independent.
#[derive(Debug, Clone)]
pub struct GeolocationResolver {
    client: reqwest::Client,
    providers: Vec<GeoProvider>,
    provider_timeout: Duration,
}

impl GeolocationResolver {
    /// A resolver over the default providers and per-provider timeout.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            providers: default_providers(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Replaces the provider list (priority order).
    pub fn with_providers(mut self, providers: Vec<GeoProvider>) -> Self {
        self.providers = providers;
        self
    }

    /// Sets the per-provider request timeout.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Configured providers in priority order.
    pub fn providers(&self) -> &[GeoProvider] {
        &self.providers
    }

    /// Issues one GET against `provider` and validates the translated body.
    async fn attempt(&self, provider: &GeoProvider) -> Result<LocationRecord, ProviderError> {
        let timeout = self.provider_timeout;
        let fetch = async {
            let response = self
                .client
                .get(&provider.url)
                .header(ACCEPT, ACCEPT_JSON)
                .header(USER_AGENT, CLIENT_USER_AGENT)
                .send()
                .await
                .map_err(|e| categorize_reqwest_error(&e, timeout))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProviderError::Http(status.as_u16()));
            }

            response
                .text()
                .await
                .map_err(|e| categorize_reqwest_error(&e, timeout))
        };

        // Dropping the fetch future on expiry aborts the in-flight request
        let body = tokio::time::timeout(timeout, fetch)
            .await
            .map_err(|_| ProviderError::Timeout(timeout))??;

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedBody(e.to_string()))?;
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ProviderError::MalformedBody(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        (provider.translate)(&object).validate()
    }

    /// Walks the provider list and reports every failed attempt.
    pub async fn resolve(&self) -> LocationResolution {
        let mut failures = Vec::new();

        for provider in &self.providers {
            match self.attempt(provider).await {
                Ok(record) => {
                    log::debug!(
                        "Geolocation resolved by {}: {}, {}",
                        provider.name,
                        record.city,
                        record.country
                    );
                    return LocationResolution {
                        location: Some(record),
                        failures,
                    };
                }
                Err(error) => {
                    log::warn!(
                        "Geolocation provider {} failed ({}): {}",
                        provider.name,
                        error.kind(),
                        error
                    );
                    failures.push(ProviderFailure {
                        provider: provider.name,
                        error,
                    });
                }
            }
        }

        log::warn!(
            "All geolocation providers failed ({} attempted)",
            failures.len()
        );
        LocationResolution {
            location: None,
            failures,
        }
    }

    /// First valid record from the provider list, `None` if every provider failed.
    pub async fn get_location(&self) -> Option<LocationRecord> {
        self.resolve().await.location
    }

    /// Like [`get_location`](Self::get_location), but gives up after `timeout`
    /// regardless of how far the provider sequence has progressed.
    pub async fn get_location_with_timeout(&self, timeout: Duration) -> Option<LocationRecord> {
        match tokio::time::timeout(timeout, self.get_location()).await {
            Ok(location) => location,
            Err(_) => {
                log::warn!(
                    "Geolocation lookup timed out after {}ms",
                    timeout.as_millis()
                );
                None
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Whether a location lookup can be attempted from `env`.
///
/// Requires a page origin and a networking primitive. Insecure origins other
/// than `localhost` are allowed but logged, since some hosts restrict
/// networking from them.
pub fn is_location_service_available(env: &dyn Environment) -> bool {
    let Some(origin) = env.page_origin() else {
        log::debug!("No page context, location service unavailable");
        return false;
    };
    if !env.has_networking() {
        log::debug!("No networking primitive, location service unavailable");
        return false;
    }

    let secure = origin.scheme() == "https" || origin.host_str() == Some("localhost");
    if !secure {
        log::warn!(
            "Page origin {} is neither HTTPS nor localhost; location requests may be blocked",
            origin
        );
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StaticEnvironment;
    use url::Url;

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&Value::Null), "null");
        assert_eq!(json_kind(&serde_json::json!([1])), "an array");
    }

    #[test]
    fn test_service_unavailable_without_page() {
        let env = StaticEnvironment::new("ua").with_networking(true);
        assert!(!is_location_service_available(&env));
    }

    #[test]
    fn test_service_unavailable_without_networking() {
        let env = StaticEnvironment::new("ua")
            .with_page_origin(Url::parse("https://example.com").unwrap())
            .with_networking(false);
        assert!(!is_location_service_available(&env));
    }

    #[test]
    fn test_service_available_on_secure_and_insecure_origins() {
        for origin in [
            "https://example.com",
            "http://localhost:3000",
            "http://example.com",
        ] {
            let env = StaticEnvironment::new("ua")
                .with_page_origin(Url::parse(origin).unwrap())
                .with_networking(true);
            assert!(is_location_service_available(&env), "{}", origin);
        }
    }

    #[tokio::test]
    async fn test_empty_provider_list_resolves_to_none() {
        let resolver = GeolocationResolver::new(reqwest::Client::new()).with_providers(Vec::new());
        let resolution = resolver.resolve().await;
        assert_eq!(resolution, LocationResolution::default());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_failure() {
        let resolver = GeolocationResolver::new(reqwest::Client::new())
            .with_providers(vec![GeoProvider::ipapi_co("http://127.0.0.1:9/json/")]);
        let resolution = resolver.resolve().await;
        assert!(resolution.location.is_none());
        assert_eq!(resolution.failures.len(), 1);
        assert_eq!(
            resolution.failures[0].error.kind(),
            crate::error_handling::ProviderFailureKind::NetworkError
        );
    }
}
