//! IP-based geolocation.
//!
//! This module queries a short, ordered list of external IP-geolocation
//! providers, translates their response shapes to a common record, validates
//! it, and returns the first valid result. Lookups never fail: exhausting the
//! providers yields `None`.

mod lookup;
mod providers;
mod types;

// Re-export public API
pub use lookup::{
    is_location_service_available, GeolocationResolver, LocationResolution, ProviderFailure,
};
pub use providers::{
    default_providers, translate_ip_api_com, translate_ipapi_co, GeoProvider, Translate,
};
pub use types::{LocationRecord, RawLocation};
