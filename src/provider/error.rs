//! Error types for provider operations.

use thiserror::Error;

/// Errors that can occur while talking to a mapping provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Provider returned an HTTP error response (4xx, 5xx).
    #[error("Provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider answered 200 but reported a failure status in the body
    /// (e.g. `ZERO_RESULTS`, `REQUEST_DENIED`, `OVER_QUERY_LIMIT`).
    #[error("Provider returned status {status}{}", format_message(.message))]
    Status {
        status: String,
        message: Option<String>,
    },

    /// Response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider configuration error (missing API key, bad URL).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn format_message(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

impl ProviderError {
    /// Map a reqwest transport error, keeping timeouts distinguishable.
    pub fn from_reqwest(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout(timeout_ms)
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}
