//! Metadata collection.
//!
//! The collector classifies the user agent first, then runs fingerprinting
//! and geolocation side by side. Each of those two is wrapped so its failure
//! only removes its own field; neither can fail or cancel the other. The
//! only error a caller ever sees is a classifier failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::MetadataConfig;
use crate::environment::Environment;
use crate::error_handling::ClassifierError;
use crate::fingerprint::{FingerprintGenerator, FingerprintSource};
use crate::geoip::{GeolocationResolver, LocationRecord};
use crate::initialization::init_client;
use crate::user_agent::{classify_environment, DeviceType};

/// Location as exposed in the output record (no IP).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    /// Country name
    pub country: String,
    /// City name
    pub city: String,
    /// Latitude in degrees, present together with `longitude`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude in degrees, present together with `latitude`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl From<&LocationRecord> for LocationSummary {
    fn from(record: &LocationRecord) -> Self {
        // Coordinates travel as a pair or not at all
        let (latitude, longitude) = match (record.latitude, record.longitude) {
            (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            _ => (None, None),
        };
        Self {
            country: record.country.clone(),
            city: record.city.clone(),
            latitude,
            longitude,
        }
    }
}

/// The assembled metadata record.
///
/// Optional signals that could not be produced are omitted from the
/// serialized form, never written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetadata {
    /// Raw user-agent string
    pub user_agent: String,
    /// Detected platform, `Unknown` when nothing matched
    pub platform: String,
    /// Detected browser, `Unknown` when nothing matched
    pub browser: String,
    /// Detected device class
    pub device_type: DeviceType,
    /// IP reported by the geolocation provider, empty when location is off
    /// or unavailable
    pub ip_address: String,
    /// Device fingerprint, omitted when disabled or unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Resolved location, omitted when disabled or unresolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationSummary>,
}

/// Collects metadata about one environment.
///
/// Stateless between calls; one collector may serve concurrent collections.
pub struct MetadataCollector {
    env: Arc<dyn Environment>,
    fingerprint: Arc<dyn FingerprintSource>,
    resolver: Option<GeolocationResolver>,
}

impl MetadataCollector {
    /// Collector with the default fingerprint generator and providers.
    ///
    /// If the HTTP client cannot be built, location lookups are disabled
    /// and logged instead of failing construction.
    pub fn new(env: Arc<dyn Environment>) -> Self {
        let resolver = match init_client() {
            Ok(client) => Some(GeolocationResolver::new(client)),
            Err(e) => {
                log::warn!("Geolocation disabled: {}", e);
                None
            }
        };
        Self {
            env,
            fingerprint: Arc::new(FingerprintGenerator::new()),
            resolver,
        }
    }

    /// Replaces the fingerprint source.
    pub fn with_fingerprint_source(mut self, source: Arc<dyn FingerprintSource>) -> Self {
        self.fingerprint = source;
        self
    }

    /// Replaces the geolocation resolver.
    pub fn with_resolver(mut self, resolver: GeolocationResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Produces one metadata record.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError` if the environment cannot supply a user agent.
    /// Fingerprint and location failures only omit their fields.
    pub async fn collect(
        &self,
        config: &MetadataConfig,
    ) -> Result<AggregateMetadata, ClassifierError> {
        let classification = classify_environment(self.env.as_ref())?;

        let fingerprint_task = async {
            if !config.include_fingerprint {
                return None;
            }
            match self
                .fingerprint
                .fingerprint(self.env.as_ref(), config.comprehensive_fingerprint)
            {
                Ok(value) if !value.is_empty() => Some(value),
                Ok(_) => {
                    log::warn!("Fingerprint source returned an empty value, omitting fingerprint");
                    None
                }
                Err(e) => {
                    log::warn!("Fingerprint generation failed, omitting fingerprint: {}", e);
                    None
                }
            }
        };

        let location_task = async {
            if !config.include_location {
                return None;
            }
            let Some(resolver) = &self.resolver else {
                return None;
            };
            if !self.env.has_networking() {
                log::debug!("No networking in this environment, skipping location");
                return None;
            }
            resolver
                .clone()
                .with_provider_timeout(config.provider_timeout())
                .get_location_with_timeout(config.location_timeout())
                .await
        };

        let (fingerprint, location) = futures::future::join(fingerprint_task, location_task).await;

        Ok(AggregateMetadata {
            user_agent: classification.user_agent,
            platform: classification.platform,
            browser: classification.browser,
            device_type: classification.device_type,
            ip_address: location
                .as_ref()
                .map(|record| record.ip.clone())
                .unwrap_or_default(),
            fingerprint,
            location: location.as_ref().map(LocationSummary::from),
        })
    }
}

/// Collects metadata for `env` with a fresh default collector.
///
/// # Errors
///
/// Returns `ClassifierError` if the environment cannot supply a user agent.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use client_metadata::{collect_metadata, MetadataConfig, StaticEnvironment};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let env = Arc::new(StaticEnvironment::from_host("Mozilla/5.0 (X11; Linux x86_64)"));
/// let metadata = collect_metadata(env, MetadataConfig::default()).await?;
/// println!("{}", serde_json::to_string_pretty(&metadata)?);
/// # Ok(())
/// # }
/// ```
pub async fn collect_metadata(
    env: Arc<dyn Environment>,
    config: MetadataConfig,
) -> Result<AggregateMetadata, ClassifierError> {
    MetadataCollector::new(env).collect(&config).await
}
