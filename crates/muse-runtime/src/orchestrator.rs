//! Tiered fallback orchestration.
//!
//! A cascade of attempt strategies evaluated by a single loop:
//!
//! 1. **Primary**: full context against the requested (or configured
//!    primary) backend
//! 2. **Fallback**: same context against the deterministic alternate
//! 3. **LastResort**: windowed context, reduced tokens, third backend
//! 4. **Emergency**: fixed synthetic text, no network call
//!
//! The cascade always terminates with non-empty text; at most three
//! network attempts happen before the emergency floor. Adding a tier is
//! a change to the plan data, not a new nesting level.
//!
//! Each invocation is independent: it owns its context and outcome, and
//! nothing is memoized across calls.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use muse_core::{BackendId, ConversationContext, Message, RawMessage};

use crate::backends::{FailureKind, GenerationRequest, TextBackend};
use crate::config::RuntimeConfig;

/// Fixed response returned when every backend tier fails. Communicates a
/// technical issue without exposing a raw error or a blank reply.
pub const EMERGENCY_TEXT: &str = "I'm having trouble reaching the generation service right now. \
     Your request was received and nothing you wrote has been lost. Please try again in a moment.";

/// One ranked attempt strategy within the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Primary,
    Fallback,
    LastResort,
    Emergency,
}

/// Provenance record for one backend attempt.
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    pub backend: BackendId,
    /// `None` when the attempt succeeded.
    pub failure: Option<FailureKind>,
}

impl Attempt {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Final result of a cascade run.
///
/// `final_text` is always non-empty; `attempts` records every network
/// attempt in order, so the surrounding application gets diagnostics
/// without inspecting live logs.
#[derive(Debug, Clone, Serialize)]
pub struct CascadeOutcome {
    pub final_text: String,
    pub tier_used: Tier,
    pub attempts: Vec<Attempt>,
    /// Epoch milliseconds at completion.
    pub completed_at_millis: i64,
}

/// A caller's generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Prior conversation history, raw; normalized per call.
    pub history: Vec<RawMessage>,
    /// Backend to try first; defaults to the configured primary.
    pub backend: Option<BackendId>,
}

impl GenerateRequest {
    /// Request with no prior history.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// One planned tier: which backend, which context bound, which token cap.
struct TierPlan {
    tier: Tier,
    backend: BackendId,
    /// Context window in turns; `None` sends the full context.
    window: Option<usize>,
    max_tokens: u32,
}

/// Drives the cascade until a tier yields usable text.
///
/// Holds no per-call state: concurrent `generate` calls share only the
/// backend client and the read-only configuration.
pub struct GenerationOrchestrator {
    backend: Arc<dyn TextBackend>,
    config: RuntimeConfig,
}

impl GenerationOrchestrator {
    pub fn new(backend: Arc<dyn TextBackend>, config: RuntimeConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run the cascade for one request. Never fails: the emergency tier
    /// is the floor.
    pub async fn generate(&self, request: GenerateRequest) -> CascadeOutcome {
        let mut context = ConversationContext::normalize(&request.history);
        if !request.prompt.trim().is_empty() {
            context.push_deduped(Message::user(request.prompt.clone()));
        }
        tracing::debug!(context = %context.summarize(), "built conversation context");

        let first = request.backend.unwrap_or(self.config.primary);
        let plan = [
            TierPlan {
                tier: Tier::Primary,
                backend: first,
                window: None,
                max_tokens: self.config.max_tokens,
            },
            TierPlan {
                tier: Tier::Fallback,
                backend: self.config.fallback_for(first),
                window: None,
                max_tokens: self.config.max_tokens,
            },
            TierPlan {
                tier: Tier::LastResort,
                backend: self.config.last_resort,
                window: Some(self.config.window_turns),
                max_tokens: self.config.reduced_max_tokens,
            },
        ];

        let mut attempts = Vec::with_capacity(plan.len());

        for step in plan {
            let tier_context = match step.window {
                Some(turns) => context.windowed(turns),
                None => context.clone(),
            };

            let attempt_request = GenerationRequest {
                backend: step.backend,
                messages: tier_context.into_messages(),
                temperature: self.config.temperature,
                max_tokens: step.max_tokens,
                system_prompt: self.config.system_prompt.clone(),
                private: self.config.private,
            };

            match self
                .backend
                .generate(&attempt_request, self.config.request_timeout)
                .await
            {
                Ok(text) => {
                    attempts.push(Attempt {
                        backend: step.backend,
                        failure: None,
                    });
                    tracing::info!(
                        tier = ?step.tier,
                        backend = %step.backend,
                        attempts = attempts.len(),
                        "generation succeeded"
                    );
                    return CascadeOutcome {
                        final_text: text,
                        tier_used: step.tier,
                        attempts,
                        completed_at_millis: chrono::Utc::now().timestamp_millis(),
                    };
                }
                Err(error) => {
                    tracing::warn!(
                        tier = ?step.tier,
                        backend = %step.backend,
                        error = %error,
                        "tier failed, advancing cascade"
                    );
                    attempts.push(Attempt {
                        backend: step.backend,
                        failure: Some(error.kind()),
                    });
                }
            }
        }

        tracing::warn!(
            attempts = attempts.len(),
            "all backend tiers failed, emitting emergency response"
        );
        CascadeOutcome {
            final_text: EMERGENCY_TEXT.to_string(),
            tier_used: Tier::Emergency,
            attempts,
            completed_at_millis: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::backends::{BackendError, BackendResult};

    /// Backend that replays a scripted sequence of results and records
    /// every request it saw.
    struct ScriptedBackend {
        script: Mutex<VecDeque<BackendResult>>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<BackendResult>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<GenerationRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextBackend for ScriptedBackend {
        async fn generate(&self, request: &GenerationRequest, _timeout: Duration) -> BackendResult {
            self.seen.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("ok".to_string()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn orchestrator(script: Vec<BackendResult>) -> (Arc<ScriptedBackend>, GenerationOrchestrator) {
        let backend = Arc::new(ScriptedBackend::new(script));
        let orchestrator = GenerationOrchestrator::new(backend.clone(), RuntimeConfig::default());
        (backend, orchestrator)
    }

    fn turns(n: usize) -> Vec<RawMessage> {
        (0..n)
            .map(|i| RawMessage {
                role: if i % 2 == 0 { "user" } else { "assistant" }.to_string(),
                content: format!("turn {i}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_primary_success_single_attempt() {
        let (backend, orchestrator) = orchestrator(vec![Ok("hello there".to_string())]);

        let outcome = orchestrator.generate(GenerateRequest::prompt("hi")).await;

        assert_eq!(outcome.tier_used, Tier::Primary);
        assert_eq!(outcome.final_text, "hello there");
        assert_eq!(outcome.attempts.len(), 1);
        assert!(outcome.attempts[0].succeeded());
        assert_eq!(backend.seen()[0].backend, BackendId::Openai);
    }

    #[tokio::test]
    async fn test_fallback_after_primary_failure() {
        let (backend, orchestrator) = orchestrator(vec![
            Err(BackendError::Transport("status 502".into())),
            Ok("recovered".to_string()),
        ]);

        let outcome = orchestrator.generate(GenerateRequest::prompt("hi")).await;

        assert_eq!(outcome.tier_used, Tier::Fallback);
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(outcome.attempts[0].failure, Some(FailureKind::Transport));
        assert!(outcome.attempts[1].succeeded());

        // Fallback never repeats the failed backend
        let seen = backend.seen();
        assert_eq!(seen[0].backend, BackendId::Openai);
        assert_eq!(seen[1].backend, BackendId::Mistral);
    }

    #[tokio::test]
    async fn test_last_resort_gets_windowed_reduced_request() {
        let timeout = Duration::from_secs(30);
        let (backend, orchestrator) = orchestrator(vec![
            Err(BackendError::Timeout(timeout)),
            Err(BackendError::Timeout(timeout)),
            Ok("degraded but alive".to_string()),
        ]);

        let request = GenerateRequest {
            prompt: "one more thing".to_string(),
            history: turns(8),
            backend: None,
        };
        let outcome = orchestrator.generate(request).await;

        assert_eq!(outcome.tier_used, Tier::LastResort);
        assert_eq!(outcome.attempts.len(), 3);

        let seen = backend.seen();
        // Full context (8 turns + new prompt) on the first two tiers
        assert_eq!(seen[0].messages.len(), 9);
        assert_eq!(seen[1].messages.len(), 9);
        // Windowed context and reduced tokens on the last resort
        assert_eq!(seen[2].backend, BackendId::Llama);
        assert!(seen[2].messages.len() <= 6);
        assert_eq!(seen[2].messages.last().unwrap().content, "one more thing");
        assert_eq!(seen[2].max_tokens, RuntimeConfig::default().reduced_max_tokens);
    }

    #[tokio::test]
    async fn test_emergency_floor_when_all_tiers_fail() {
        let (_, orchestrator) = orchestrator(vec![
            Err(BackendError::Transport("down".into())),
            Err(BackendError::EmptyResponse),
            Err(BackendError::MalformedResponse("garbage".into())),
        ]);

        let outcome = orchestrator.generate(GenerateRequest::prompt("hi")).await;

        assert_eq!(outcome.tier_used, Tier::Emergency);
        assert_eq!(outcome.final_text, EMERGENCY_TEXT);
        assert_eq!(outcome.attempts.len(), 3);
        assert!(outcome.attempts.iter().all(|a| !a.succeeded()));
        assert!(!outcome.final_text.is_empty());
    }

    #[tokio::test]
    async fn test_trailing_duplicate_prompt_not_doubled() {
        let (backend, orchestrator) = orchestrator(vec![Ok("fine".to_string())]);

        let mut history = turns(2);
        history.push(RawMessage {
            role: "user".to_string(),
            content: "X".to_string(),
        });
        let request = GenerateRequest {
            prompt: "X".to_string(),
            history,
            backend: None,
        };
        orchestrator.generate(request).await;

        let messages = &backend.seen()[0].messages;
        assert_eq!(messages.len(), 3);
        for pair in messages.windows(2) {
            assert_ne!(pair[0], pair[1], "consecutive duplicate turns in request");
        }
    }

    #[tokio::test]
    async fn test_requested_backend_swaps_with_primary_on_fallback() {
        let (backend, orchestrator) = orchestrator(vec![
            Err(BackendError::Transport("down".into())),
            Ok("ok".to_string()),
        ]);

        let request = GenerateRequest {
            prompt: "hi".to_string(),
            history: Vec::new(),
            backend: Some(BackendId::Mistral),
        };
        orchestrator.generate(request).await;

        let seen = backend.seen();
        assert_eq!(seen[0].backend, BackendId::Mistral);
        assert_eq!(seen[1].backend, BackendId::Openai);
    }

    #[test]
    fn test_tier_wire_names() {
        assert_eq!(serde_json::to_string(&Tier::LastResort).unwrap(), r#""LastResort""#);
        assert_eq!(serde_json::to_string(&Tier::Emergency).unwrap(), r#""Emergency""#);
    }
}
