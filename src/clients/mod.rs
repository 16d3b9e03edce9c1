//! HTTP clients for the remote speech services.
//!
//! Both services are plain JSON-over-HTTP APIs guarded by a static
//! `Authorization` credential. [`ServiceClient`] carries the base URL, the
//! credential and a pooled `reqwest::Client`; [`TtsClient`] and
//! [`VoiceConversionClient`] add the typed endpoints on top.
//!
//! No retries, caching or timeout overrides are applied. A non-success
//! response becomes [`ClientError::Upstream`] with the remote status and body
//! untouched so the HTTP layer can pass them straight back to the browser.

mod seedvc;
mod tts;

use std::fmt;

use http::{HeaderValue, header::AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroize;

use crate::utils::url_validation::{UrlValidationError, validate_service_url};

pub use seedvc::{ConvertVoiceRequest, VoiceConversionClient};
pub use tts::{GenerateSpeechRequest, TtsClient};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, TLS or response decoding failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Remote service returned HTTP {status}")]
    Upstream { status: u16, body: String },

    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),
}

/// `{"voices": [...]}` as returned by both services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<String>,
}

/// Result of a generation or conversion job: where the audio landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAudio {
    pub audio_url: String,
    pub s3_key: String,
}

/// Normalize a configured credential into an `Authorization` header value.
///
/// A bare token gets the `Bearer` scheme; anything already carrying a scheme
/// (`Bearer abc`, `Basic xyz`, `Token t`) is used as-is.
pub fn authorization_value(credential: &str) -> Option<String> {
    let credential = credential.trim();
    if credential.is_empty() {
        return None;
    }
    if credential.contains(char::is_whitespace) {
        Some(credential.to_string())
    } else {
        Some(format!("Bearer {credential}"))
    }
}

/// Base URL + credential + connection pool for one remote service
#[derive(Clone)]
pub struct ServiceClient {
    name: &'static str,
    base_url: Url,
    authorization: Option<String>,
    http: Client,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("name", &self.name)
            .field("base_url", &self.base_url.as_str())
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Drop for ServiceClient {
    fn drop(&mut self) {
        if let Some(auth) = self.authorization.as_mut() {
            auth.zeroize();
        }
    }
}

impl ServiceClient {
    pub fn new(name: &'static str, base_url: &str, credential: &str) -> ClientResult<Self> {
        let base_url = validate_service_url(base_url)?;
        let authorization = authorization_value(credential);
        if authorization.is_none() {
            warn!(
                service = name,
                "No credential configured; requests go out unauthenticated"
            );
        }

        let http = Client::builder().build()?;

        Ok(Self {
            name,
            base_url,
            authorization,
            http,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(UrlValidationError::InvalidFormat(e)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self
            .authorization
            .as_deref()
            .and_then(|a| HeaderValue::from_str(a).ok())
        {
            Some(mut value) => {
                value.set_sensitive(true);
                request.header(AUTHORIZATION, value)
            }
            None => request,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.endpoint(path)?;
        debug!(service = self.name, url = %url, "GET");
        let request = self.authorize(self.http.get(url));
        Self::read_json(self.name, request).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(service = self.name, url = %url, "POST");
        let request = self.authorize(self.http.post(url).json(body));
        Self::read_json(self.name, request).await
    }

    async fn read_json<T: DeserializeOwned>(
        service: &'static str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                service,
                status = status.as_u16(),
                "Remote service rejected request"
            );
            return Err(ClientError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
