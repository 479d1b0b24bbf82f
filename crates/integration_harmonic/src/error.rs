//! Harmonic error types

use thiserror::Error;

/// Errors returned by the Harmonic client
///
/// An unknown company is not an error; see
/// [`EnrichmentResult::NotFound`](crate::EnrichmentResult::NotFound).
#[derive(Debug, Error)]
pub enum HarmonicError {
    /// Connection to Harmonic failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request was rejected or could not be sent
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API key is missing or invalid
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Harmonic returned a 5xx status
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// The GraphQL response carried errors
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl HarmonicError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::ServerError { .. }
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}
