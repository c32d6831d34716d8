//! Error types for the Gemini client.

use thiserror::Error;

/// Errors that can occur when calling the Generative Language API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Response parsed but carried no candidate text
    #[error("Response contained no candidate text")]
    EmptyResponse,

    /// Invalid configuration (endpoint, header value)
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl GeminiError {
    /// True when the failure happened before or during transport, as opposed
    /// to a well-formed reply with the wrong shape.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GeminiError::HttpError(_) | GeminiError::ApiError { .. } | GeminiError::ConfigError(_)
        )
    }
}

impl From<serde_json::Error> for GeminiError {
    fn from(err: serde_json::Error) -> Self {
        GeminiError::ParseError(err.to_string())
    }
}

impl From<url::ParseError> for GeminiError {
    fn from(err: url::ParseError) -> Self {
        GeminiError::ConfigError(err.to_string())
    }
}
