//! HTTP client for text-generation backends.
//!
//! One invocation, one request: a hard per-request timeout cancels the
//! in-flight call on expiry, a non-success status maps to `Transport`, a
//! body that will not parse maps to `MalformedResponse`, and a parsed
//! body without a usable text field maps to `EmptyResponse`.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;

use muse_core::Message;

use super::{BackendError, BackendResult, GenerationRequest, TextBackend};
use crate::backends::BackendRegistry;
use crate::secrets::ApiCredential;

/// HTTP implementation of [`TextBackend`].
pub struct HttpTextBackend {
    registry: BackendRegistry,
    credential: Option<ApiCredential>,
}

impl HttpTextBackend {
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            registry,
            credential: None,
        }
    }

    /// Attach a bearer token sent with every request.
    pub fn with_credential(mut self, credential: ApiCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    fn client(&self) -> &reqwest::Client {
        // Shared across invocations for connection pooling; per-request
        // timeouts are applied on each call, not here.
        static CLIENT: std::sync::OnceLock<reqwest::Client> = std::sync::OnceLock::new();
        CLIENT.get_or_init(|| {
            reqwest::Client::builder()
                .build()
                .expect("failed to build HTTP client")
        })
    }
}

/// Backend wire request format.
#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    messages: Vec<WireMessage<'a>>,
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    private: Option<bool>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> WireMessage<'a> {
    fn from_message(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

/// Pull the generated text out of a parsed response body.
///
/// Backends disagree on the field name; a flat `text` is the documented
/// shape, with common equivalents accepted.
fn extract_text(value: &JsonValue) -> Option<&str> {
    for key in ["text", "response", "content", "output"] {
        if let Some(text) = value.get(key).and_then(JsonValue::as_str) {
            return Some(text);
        }
    }
    // OpenAI-compatible shape
    value
        .pointer("/choices/0/message/content")
        .and_then(JsonValue::as_str)
}

/// Classify a raw success body into generated text or a typed failure.
pub(crate) fn parse_body(body: &str) -> BackendResult {
    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

    match extract_text(&value) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(BackendError::EmptyResponse),
    }
}

#[async_trait]
impl TextBackend for HttpTextBackend {
    async fn generate(&self, request: &GenerationRequest, timeout: Duration) -> BackendResult {
        let endpoint = self.registry.endpoint(request.backend);

        let mut messages: Vec<WireMessage<'_>> = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system_prompt {
            messages.push(WireMessage {
                role: "system",
                content: system,
            });
        }
        messages.extend(request.messages.iter().map(WireMessage::from_message));

        let body = WireRequest {
            messages,
            model: request.backend.as_str(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            private: request.private.then_some(true),
        };

        let mut call = self.client().post(endpoint).timeout(timeout).json(&body);
        if let Some(credential) = &self.credential {
            // Credential exposed only here, at the point of use
            call = call.bearer_auth(credential.expose());
        }

        let response = call.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(timeout)
            } else {
                BackendError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Transport(format!(
                "backend '{}' returned status {status}",
                request.backend
            )));
        }

        let raw = response.text().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(timeout)
            } else {
                BackendError::Transport(e.to_string())
            }
        })?;

        parse_body(&raw)
    }

    fn name(&self) -> &str {
        "http"
    }
}
