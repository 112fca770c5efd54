//! Upstream provider error types.

use thiserror::Error;

/// Failures reaching or decoding the financial data provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpstreamError {
    /// The provider rejected the API key (HTTP 401/403).
    #[error("Provider rejected the API key (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The provider is throttling requests (HTTP 429).
    #[error("Provider rate limit exceeded, retry later")]
    RateLimited,

    /// Server error, network failure or timeout.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The response body could not be decoded as expected.
    #[error("Provider returned malformed data: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// Create a new "unavailable" error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new "malformed" error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Stable kind label used in error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UpstreamUnauthorized",
            Self::RateLimited => "UpstreamRateLimited",
            Self::Unavailable(_) => "UpstreamUnavailable",
            Self::Malformed(_) => "UpstreamMalformed",
        }
    }
}
