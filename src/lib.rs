//! client_metadata library: environment signal collection
//!
//! This library assembles one descriptive record about a client environment:
//! user-agent derived platform, browser and device type, a best-effort device
//! fingerprint, and optional IP-based geolocation. Every optional signal
//! degrades independently; a missing fingerprint or location simply drops
//! its field from the record.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use client_metadata::{MetadataCollector, MetadataConfig, StaticEnvironment};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let env = StaticEnvironment::from_host("Mozilla/5.0 (X11; Linux x86_64) Firefox/126.0");
//! let collector = MetadataCollector::new(Arc::new(env));
//!
//! let config = MetadataConfig {
//!     include_location: true,
//!     ..Default::default()
//! };
//! let metadata = collector.collect(&config).await?;
//! println!("{} on {} ({})", metadata.browser, metadata.platform, metadata.device_type);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Geolocation and the UI binding need a Tokio runtime.

#![warn(missing_docs)]

pub mod binding;
mod collector;
pub mod config;
pub mod environment;
mod error_handling;
pub mod fingerprint;
pub mod geoip;
pub mod initialization;
mod user_agent;

// Re-export public API
pub use binding::{BindingState, MetadataBinding};
pub use collector::{collect_metadata, AggregateMetadata, LocationSummary, MetadataCollector};
pub use config::{LogFormat, LogLevel, MetadataConfig};
pub use environment::{Environment, ScreenInfo, StaticEnvironment, WebGlInfo};
pub use error_handling::{
    categorize_reqwest_error, ClassifierError, ConfigError, EnvironmentError, FingerprintError,
    InitializationError, ProviderError, ProviderFailureKind,
};
pub use fingerprint::{
    FingerprintGenerator, FingerprintLibrary, FingerprintOutcome, FingerprintSource,
};
pub use geoip::{
    is_location_service_available, GeoProvider, GeolocationResolver, LocationRecord,
    LocationResolution,
};
pub use user_agent::{classify_environment, classify_user_agent, ClassificationResult, DeviceType};
