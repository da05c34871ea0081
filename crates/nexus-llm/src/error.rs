//! Error types for nexus-llm

use thiserror::Error;

/// Backend error type
///
/// Display strings are inspected downstream to classify failures for the
/// user, so each variant carries a stable textual marker ("rate limit",
/// "blocked", "network", "timeout").
#[derive(Debug, Error)]
pub enum Error {
    /// Backend not configured
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    /// API error
    #[error("api error: {0}")]
    Api(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded (quota)")]
    RateLimit,

    /// Content blocked by safety filtering
    #[error("request blocked by safety filtering: {0}")]
    Blocked(String),

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
