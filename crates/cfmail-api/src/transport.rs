// Transport configuration for building the reqwest::Client.
//
// Carries the API base URL, timeout and the key/email header pair that
// Cloudflare's global-key auth expects on every request.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// Default Cloudflare v4 API root.
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

const USER_AGENT: &str = concat!("cf-empty-email/", env!("CARGO_PKG_VERSION"));

/// Global API key + account email, sent as `X-Auth-Key` / `X-Auth-Email`.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub key: SecretString,
    pub email: String,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl TransportConfig {
    /// Transport rooted at `base_url` with the default 30s timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` with the auth headers installed as defaults.
    pub fn build_client(&self, credentials: &ApiCredentials) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();

        let mut key = HeaderValue::from_str(credentials.key.expose_secret())
            .map_err(|e| Error::ClientBuild(format!("invalid API key header: {e}")))?;
        key.set_sensitive(true);
        headers.insert("X-Auth-Key", key);

        let email = HeaderValue::from_str(&credentials.email)
            .map_err(|e| Error::ClientBuild(format!("invalid API email header: {e}")))?;
        headers.insert("X-Auth-Email", email);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}
