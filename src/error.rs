//! Error types shared by the provider and resolver layers

use thiserror::Error;

/// Failure talking to the external place-search provider.
///
/// Every variant means the provider could not answer the query; the
/// resolver never retries these itself and aborts the whole request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider request timed out")]
    Timeout,
    #[error("provider rate limit exceeded")]
    RateLimited,
    #[error("provider denied the request: {0}")]
    RequestDenied(String),
    #[error("provider rejected the request as invalid: {0}")]
    InvalidRequest(String),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether the failure happened below the provider protocol and may
    /// succeed on a second attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// Short label used for metrics keys
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::RequestDenied(_) => "request_denied",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Status(_) => "http_status",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Which part of a resolution issued the failing provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Free-text candidate search for a keyword
    Candidates(String),
    /// Keyword-less proximity query around a seed place
    Neighborhood(String),
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Candidates(keyword) => write!(f, "candidate search for '{}'", keyword),
            Self::Neighborhood(seed) => write!(f, "neighborhood search around '{}'", seed),
        }
    }
}

/// Hard failures of a resolution request.
///
/// "Nothing matched" is not an error; see [`crate::resolver::Resolution`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("{phase} failed: {source}")]
    Provider {
        phase: Phase,
        #[source]
        source: ProviderError,
    },
    #[error("invalid resolver configuration: {0}")]
    Config(String),
}

impl ResolveError {
    pub fn provider(phase: Phase, source: ProviderError) -> Self {
        Self::Provider { phase, source }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
