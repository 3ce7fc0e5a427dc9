//! # muse-runtime
//!
//! Async orchestration layer over external text-generation backends.
//!
//! Turns a user request into a reliable response from one of several
//! interchangeable, unreliable backends:
//!
//! - [`backends`]: single-attempt HTTP client behind the [`TextBackend`]
//!   trait, with a typed failure taxonomy
//! - [`orchestrator`]: the tiered cascade (primary, fallback, last
//!   resort, emergency) with full attempt provenance
//! - [`config`]: startup-validated runtime configuration
//! - [`synthesizer`]: derivative audio-reference construction
//!
//! The orchestrator never errors: every call resolves to a
//! [`CascadeOutcome`] with non-empty text, with a fixed emergency
//! message as the absolute floor.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use muse_runtime::{
//!     BackendRegistry, GenerateRequest, GenerationOrchestrator,
//!     HttpTextBackend, RuntimeConfig,
//! };
//!
//! let config = RuntimeConfig::default();
//! let registry = BackendRegistry::from_config(&config)?;
//! let backend = Arc::new(HttpTextBackend::new(registry));
//! let orchestrator = GenerationOrchestrator::new(backend, config);
//!
//! let outcome = orchestrator.generate(GenerateRequest::prompt("hello")).await;
//! println!("{} (via {:?})", outcome.final_text, outcome.tier_used);
//! ```

pub mod backends;
pub mod config;
pub mod orchestrator;
pub mod secrets;
pub mod synthesizer;

// Re-export main types at crate root
pub use backends::{
    BackendError, BackendRegistry, BackendResult, FailureKind, GenerationRequest,
    HttpTextBackend, TextBackend,
};
pub use config::{ConfigError, RuntimeConfig};
pub use orchestrator::{
    Attempt, CascadeOutcome, GenerateRequest, GenerationOrchestrator, Tier, EMERGENCY_TEXT,
};
pub use secrets::{ApiCredential, CredentialSource};
pub use synthesizer::{ResponseSynthesizer, UrlSynthesizer};
