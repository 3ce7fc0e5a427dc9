//! Generation endpoint.
//!
//! The orchestration boundary always answers HTTP 200 once input is
//! valid, even in total backend outage, so the caller can render the
//! emergency text. Only malformed input gets a 4xx.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use muse_core::RawMessage;
use muse_runtime::{GenerateRequest, Tier};

use crate::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Conversation,
    #[default]
    Direct,
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub text: String,
    /// Optional voice id, passed through to the synthesizer only.
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    /// Prior conversation turns; used only in conversation mode.
    #[serde(default)]
    pub context: Vec<RawMessage>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(rename = "responseText")]
    pub response_text: String,
    #[serde(rename = "tierUsed")]
    pub tier_used: Tier,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "audioUrl", skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                success: false,
                error: message.into(),
            }),
        )
    }
}

pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ApiError>)> {
    if body.text.trim().is_empty() {
        return Err(ApiError::bad_request("'text' must be a non-empty string"));
    }

    let history = match body.mode {
        Mode::Conversation => body.context,
        Mode::Direct => Vec::new(),
    };

    let outcome = state
        .orchestrator
        .generate(GenerateRequest {
            prompt: body.text,
            history,
            backend: None,
        })
        .await;

    let audio_url = body
        .voice
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(|voice| state.synthesizer.audio_reference(&outcome.final_text, voice));

    Ok(Json(GenerateResponse {
        success: true,
        response_text: outcome.final_text,
        tier_used: outcome.tier_used,
        timestamp: outcome.completed_at_millis,
        audio_url,
    }))
}
