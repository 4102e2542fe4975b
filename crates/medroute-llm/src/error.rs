//! Error types for generation-model calls.

use thiserror::Error;

/// Errors that can occur when calling the generation model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The hard wall-clock deadline elapsed. Terminal per attempt -- a
    /// timeout is never retried.
    #[error("model timeout")]
    Timeout,

    /// The API returned a non-success status. Retryable only for the fixed
    /// set 429/500/502/503.
    #[error("model status {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// No API key available.
    #[error("model not configured: {0}")]
    NotConfigured(String),

    /// The API responded 2xx but the payload was not usable.
    #[error("invalid model response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
