//! Error types for nexus-core

use thiserror::Error;

/// Orchestration error type
///
/// Strategy failures never surface here - they are converted into
/// error-flagged envelopes before reaching the orchestrator boundary.
/// These variants cover requests that were rejected before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A request is already in flight; sends are rejected, not queued
    #[error("a request is already in flight")]
    Busy,

    /// Nothing to send: empty prompt and no attachment
    #[error("empty prompt and no attachment")]
    EmptyInput,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
