//! Text-generation backend abstractions.
//!
//! [`TextBackend`] is the only seam through which network calls leave
//! this crate. Every failure mode is represented in the return value;
//! nothing panics or escapes past the boundary. The orchestrator treats
//! all four failure kinds as recoverable by advancing the cascade.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use muse_core::{BackendId, Message};

mod http;
mod registry;

pub use http::HttpTextBackend;
pub use registry::BackendRegistry;

/// Errors from a single backend attempt.
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("response missing generated text")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Failure taxonomy recorded in cascade provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Timeout,
    Transport,
    EmptyResponse,
    MalformedResponse,
}

impl BackendError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BackendError::Timeout(_) => FailureKind::Timeout,
            BackendError::Transport(_) => FailureKind::Transport,
            BackendError::EmptyResponse => FailureKind::EmptyResponse,
            BackendError::MalformedResponse(_) => FailureKind::MalformedResponse,
        }
    }
}

/// A single generation attempt against one backend.
///
/// Constructed by the orchestrator per tier; immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub backend: BackendId,
    /// Bounded conversation context, oldest first.
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: Option<String>,
    /// Ask the backend not to log or publish the exchange.
    pub private: bool,
}

/// Result of one backend attempt: generated text or a typed failure.
pub type BackendResult = Result<String, BackendError>;

/// Single-attempt call to one named backend.
///
/// Implementations make exactly one network call per invocation; retry
/// policy lives in the orchestrator's cascade, not here.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Execute one generation attempt with a hard timeout. On expiry the
    /// underlying network operation is cancelled.
    async fn generate(&self, request: &GenerationRequest, timeout: Duration) -> BackendResult;

    /// Backend client name for diagnostics.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        assert_eq!(
            BackendError::Timeout(Duration::from_secs(30)).kind(),
            FailureKind::Timeout
        );
        assert_eq!(
            BackendError::Transport("status 502".into()).kind(),
            FailureKind::Transport
        );
        assert_eq!(BackendError::EmptyResponse.kind(), FailureKind::EmptyResponse);
        assert_eq!(
            BackendError::MalformedResponse("not json".into()).kind(),
            FailureKind::MalformedResponse
        );
    }
}
