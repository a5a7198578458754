// Cloudflare API HTTP client
//
// Wraps `reqwest::Client` with base-URL path joining and envelope
// unwrapping. Endpoint groups (zones, records) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;
use crate::transport::{ApiCredentials, TransportConfig};

/// Raw HTTP client for the Cloudflare v4 API.
///
/// Handles the `{ success, errors, messages, result }` envelope. All
/// methods return the unwrapped `result` payload.
pub struct CloudflareClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CloudflareClient {
    /// Create a client from a `TransportConfig` and the account credentials.
    pub fn new(transport: &TransportConfig, credentials: &ApiCredentials) -> Result<Self, Error> {
        let http = transport.build_client(credentials)?;
        Ok(Self {
            http,
            base_url: transport.base_url.clone(),
        })
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append `path` to the API root: `{base}/{path}`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;

        self.parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).json(body).send().await?;

        self.parse_envelope(resp).await
    }

    /// Send a DELETE request and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {}", url);

        let resp = self.http.delete(url).send().await?;

        self.parse_envelope(resp).await
    }

    /// Parse the envelope, returning `result` on success or an
    /// `Error::Api` if the status or the `success` flag says otherwise.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        // Error bodies are usually envelopes too; prefer their messages.
        let envelope = serde_json::from_str::<ApiResponse<T>>(&body);

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let message = envelope
                .ok()
                .map(|env| join_messages(&env.errors))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::Authentication { message });
        }

        if !status.is_success() {
            let message = match envelope {
                Ok(env) if !env.errors.is_empty() => join_messages(&env.errors),
                _ => preview(&body).to_owned(),
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = envelope.map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        if !envelope.success {
            return Err(Error::Api {
                status: status.as_u16(),
                message: join_messages(&envelope.errors),
            });
        }

        envelope.result.ok_or_else(|| Error::Deserialization {
            message: "response envelope has no result".into(),
            body,
        })
    }
}

fn join_messages(messages: &[crate::models::ApiMessage]) -> String {
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
