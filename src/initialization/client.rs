//! HTTP client initialization.

use crate::config::CLIENT_USER_AGENT;
use crate::error_handling::InitializationError;

/// Builds the HTTP client used for geolocation requests.
///
/// No client-wide timeout is set: each provider attempt runs under its own
/// timer so that cancellation is reported per provider. Redirects are not
/// followed since providers answer directly.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the TLS backend cannot
/// be initialized.
pub fn init_client() -> Result<reqwest::Client, InitializationError> {
    let client = reqwest::Client::builder()
        .user_agent(CLIENT_USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    Ok(client)
}
