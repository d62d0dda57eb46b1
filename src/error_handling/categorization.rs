//! Error categorization.
//!
//! Maps transport-level `reqwest` failures onto provider failure categories.

use std::time::Duration;

use super::types::ProviderError;

/// Categorizes a `reqwest::Error` raised during a provider attempt.
///
/// `timeout` is the per-provider budget the request ran under; it is only used
/// to describe client-level timeouts.
pub fn categorize_reqwest_error(error: &reqwest::Error, timeout: Duration) -> ProviderError {
    if let Some(status) = error.status() {
        return ProviderError::Http(status.as_u16());
    }

    if error.is_timeout() {
        ProviderError::Timeout(timeout)
    } else if error.is_decode() || error.is_body() {
        ProviderError::MalformedBody(error.to_string())
    } else if error.is_connect() || error.is_request() {
        ProviderError::Network(error.to_string())
    } else {
        // Builder and redirect errors are not expected for fixed GET endpoints
        ProviderError::Unknown(error.to_string())
    }
}
