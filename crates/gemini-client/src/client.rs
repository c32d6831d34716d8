//! HTTP client for the Generative Language API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use url::Url;

use crate::error::GeminiError;
use crate::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Public endpoint for the v1beta API
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Header carrying the API key. Keeps the key out of request URLs and logs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest error body kept in `ApiError` messages
const MAX_ERROR_BODY: usize = 512;

/// Builder for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    endpoint: String,
    timeout: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl ClientBuilder {
    /// Override the API base URL (tests point this at a mock server).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Total request timeout enforced by the transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client, GeminiError> {
        // Url::join drops the last path segment unless the base ends in '/'
        let mut endpoint = self.endpoint;
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint)?;

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(GeminiError::HttpError)?;

        Ok(Client { http_client, base })
    }
}

/// Client for the `generateContent` endpoint.
///
/// The API key is supplied per call so callers can rotate it between requests
/// without rebuilding the client.
#[derive(Clone)]
pub struct Client {
    http_client: reqwest::Client,
    base: Url,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Build the endpoint URL for a model.
    pub fn endpoint_url(&self, model: &str) -> Result<Url, GeminiError> {
        Ok(self.base.join(&format!("models/{}:generateContent", model))?)
    }

    fn build_headers(api_key: &str) -> Result<HeaderMap, GeminiError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| GeminiError::ConfigError("API key is not a valid header value".into()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Issue one `generateContent` call. No retries.
    pub async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = self.endpoint_url(model)?;
        let headers = Self::build_headers(api_key)?;

        tracing::debug!(model, "Sending generateContent request");

        let response = self
            .http_client
            .post(url)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        tracing::debug!(
            candidates = parsed.candidates.len(),
            "Received generateContent response"
        );
        Ok(parsed)
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

/// Prefer the API's `error.message`, then the raw body, then the status reason.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        if !envelope.error.message.is_empty() {
            return envelope.error.message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reason.unwrap_or("unknown error").to_string();
    }

    trimmed.chars().take(MAX_ERROR_BODY).collect()
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}
