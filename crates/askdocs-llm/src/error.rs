//! Error types for LLM operations.

use thiserror::Error;

/// Errors that can occur when talking to the OpenAI-compatible API.
#[derive(Error, Debug)]
pub enum LlmError {
    /// API key environment variable is unset or empty.
    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),

    /// Unable to reach the API server.
    #[error("Connection error: could not reach {base}")]
    Unreachable { base: String },

    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Authentication rejected (bad or expired key).
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Rate limit hit on the provider side.
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// The combined prompt exceeded the model's context window.
    ///
    /// This is the one failure the query engine recovers from; every
    /// other variant propagates unchanged.
    #[error("Prompt exceeds the model's context limit: {message}")]
    ContextTooLarge { message: String },

    /// API returned some other error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was missing the expected content.
    #[error("API response contained no {0}")]
    EmptyResponse(&'static str),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;
