//! Geolocation data structures and validation.

use serde::{Deserialize, Serialize};

use crate::error_handling::ProviderError;

/// A validated location.
///
/// `country` and `city` are non-empty. Coordinates are either both absent or
/// both present, finite, and within latitude [-90, 90] / longitude [-180, 180].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Public IP as seen by the provider, empty if it did not report one
    pub ip: String,
    /// Country name
    pub country: String,
    /// City name
    pub city: String,
    /// Latitude in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Provider response translated to common field names, not yet validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLocation {
    /// Reported IP address
    pub ip: Option<String>,
    /// Reported country name
    pub country: Option<String>,
    /// Reported city name
    pub city: Option<String>,
    /// Reported latitude, unchecked
    pub latitude: Option<f64>,
    /// Reported longitude, unchecked
    pub longitude: Option<f64>,
}

fn valid_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}

fn valid_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}

impl RawLocation {
    /// Checks the record invariants.
    ///
    /// # Errors
    ///
    /// - `ProviderError::MissingFields` if country or city is absent
    /// - `ProviderError::InvalidCoordinates` if only one coordinate is present,
    ///   or either is non-finite or out of range
    pub fn validate(self) -> Result<LocationRecord, ProviderError> {
        let (Some(country), Some(city)) = (self.country, self.city) else {
            return Err(ProviderError::MissingFields);
        };

        let (latitude, longitude) = match (self.latitude, self.longitude) {
            (None, None) => (None, None),
            (Some(lat), Some(lon)) if valid_latitude(lat) && valid_longitude(lon) => {
                (Some(lat), Some(lon))
            }
            _ => return Err(ProviderError::InvalidCoordinates),
        };

        Ok(LocationRecord {
            ip: self.ip.unwrap_or_default(),
            country,
            city,
            latitude,
            longitude,
        })
    }
}
