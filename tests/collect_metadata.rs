//! Integration tests for metadata collection.
//!
//! These tests verify the assembled record end to end:
//! - Field presence and omission rules in the serialized output
//! - Partial-failure isolation between fingerprint and location
//! - The classifier failure being the only fatal case

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use client_metadata::{
    ClassifierError, DeviceType, Environment, FingerprintError, FingerprintSource,
    MetadataCollector, MetadataConfig, StaticEnvironment,
};
use helpers::{desktop_environment, ip_api_com_body, ipapi_co_body, mount_provider, resolver_for};
use wiremock::{MockServer, ResponseTemplate};

struct ThrowingFingerprint;

impl FingerprintSource for ThrowingFingerprint {
    fn fingerprint(&self, _: &dyn Environment, _: bool) -> Result<String, FingerprintError> {
        Err(FingerprintError::Library("script blocked".into()))
    }
}

fn location_config() -> MetadataConfig {
    MetadataConfig {
        include_location: true,
        location_timeout_ms: 5000,
        provider_timeout_ms: 2000,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_default_config_output_shape() {
    let collector = MetadataCollector::new(Arc::new(desktop_environment()));
    let metadata = collector.collect(&MetadataConfig::default()).await.unwrap();

    assert_eq!(metadata.browser, "Edge");
    assert_eq!(metadata.platform, "Windows 10");
    assert_eq!(metadata.device_type, DeviceType::Desktop);

    let json = serde_json::to_value(&metadata).unwrap();
    let object = json.as_object().unwrap();
    assert!(object.contains_key("fingerprint"));
    assert!(!object.contains_key("location"));
    assert_eq!(object["ipAddress"], "");
    assert_eq!(object["platform"], "Windows 10");
}

#[tokio::test]
async fn test_location_and_fingerprint_merged() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_provider(&primary, ResponseTemplate::new(200).set_body_json(ipapi_co_body()), 1).await;
    mount_provider(&fallback, ResponseTemplate::new(200).set_body_json(ip_api_com_body()), 0).await;

    let collector = MetadataCollector::new(Arc::new(desktop_environment()))
        .with_resolver(resolver_for(&primary, &fallback, Duration::from_secs(2)));
    let metadata = collector.collect(&location_config()).await.unwrap();

    assert_eq!(metadata.ip_address, "203.0.113.7");
    assert!(metadata.fingerprint.is_some());
    let location = metadata.location.as_ref().unwrap();
    assert_eq!(location.country, "Norway");
    assert_eq!(location.city, "Oslo");
    assert_eq!(location.latitude, Some(59.9127));

    let json = serde_json::to_value(&metadata).unwrap();
    assert!(json["location"].get("ip").is_none());
    assert_eq!(json["location"]["longitude"], 10.7461);
}

#[tokio::test]
async fn test_location_without_coordinates_omits_them() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    let body = serde_json::json!({"ip": "192.0.2.10", "country_name": "Japan", "city": "Osaka"});
    mount_provider(&primary, ResponseTemplate::new(200).set_body_json(body), 1).await;

    let collector = MetadataCollector::new(Arc::new(desktop_environment()))
        .with_resolver(resolver_for(&primary, &fallback, Duration::from_secs(2)));
    let metadata = collector.collect(&location_config()).await.unwrap();

    let json = serde_json::to_value(&metadata).unwrap();
    let location = json["location"].as_object().unwrap();
    assert_eq!(location["city"], "Osaka");
    assert!(!location.contains_key("latitude"));
    assert!(!location.contains_key("longitude"));
}

#[tokio::test]
async fn test_fingerprint_failure_does_not_affect_location() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_provider(&primary, ResponseTemplate::new(200).set_body_json(ipapi_co_body()), 1).await;

    let collector = MetadataCollector::new(Arc::new(desktop_environment()))
        .with_fingerprint_source(Arc::new(ThrowingFingerprint))
        .with_resolver(resolver_for(&primary, &fallback, Duration::from_secs(2)));
    let metadata = collector.collect(&location_config()).await.unwrap();

    assert!(metadata.fingerprint.is_none());
    assert_eq!(metadata.location.unwrap().city, "Oslo");
    assert_eq!(metadata.browser, "Edge");
}

#[tokio::test]
async fn test_location_failure_does_not_affect_fingerprint() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_provider(&primary, ResponseTemplate::new(500), 1).await;
    mount_provider(&fallback, ResponseTemplate::new(429), 1).await;

    let collector = MetadataCollector::new(Arc::new(desktop_environment()))
        .with_resolver(resolver_for(&primary, &fallback, Duration::from_secs(2)));
    let metadata = collector.collect(&location_config()).await.unwrap();

    assert!(metadata.location.is_none());
    assert_eq!(metadata.ip_address, "");
    assert!(metadata.fingerprint.is_some());

    let json = serde_json::to_value(&metadata).unwrap();
    assert!(json.get("location").is_none());
}

#[tokio::test]
async fn test_location_timeout_keeps_rest_of_record() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&primary)
        .await;

    let config = MetadataConfig {
        include_location: true,
        location_timeout_ms: 150,
        provider_timeout_ms: 10_000,
        ..Default::default()
    };
    let collector = MetadataCollector::new(Arc::new(desktop_environment()))
        .with_resolver(resolver_for(&primary, &fallback, Duration::from_secs(10)));
    let metadata = collector.collect(&config).await.unwrap();

    assert!(metadata.location.is_none());
    assert!(metadata.fingerprint.is_some());
}

#[tokio::test]
async fn test_fingerprint_stable_across_collections() {
    let collector = MetadataCollector::new(Arc::new(desktop_environment()));
    let first = collector.collect(&MetadataConfig::default()).await.unwrap();
    let second = collector.collect(&MetadataConfig::default()).await.unwrap();
    assert_eq!(first.fingerprint, second.fingerprint);
}

#[tokio::test]
async fn test_concurrent_collections_are_independent() {
    let collector = Arc::new(MetadataCollector::new(Arc::new(desktop_environment())));
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let collector = Arc::clone(&collector);
            tokio::spawn(async move { collector.collect(&MetadataConfig::default()).await })
        })
        .collect();

    let mut fingerprints = Vec::new();
    for task in tasks {
        fingerprints.push(task.await.unwrap().unwrap().fingerprint);
    }
    fingerprints.dedup();
    assert_eq!(fingerprints.len(), 1);
}

#[tokio::test]
async fn test_unreadable_user_agent_rejects() {
    let env = StaticEnvironment::default().with_networking(true);
    let result = MetadataCollector::new(Arc::new(env))
        .collect(&MetadataConfig::default())
        .await;
    assert!(matches!(result, Err(ClassifierError::UserAgentUnavailable(_))));
}
