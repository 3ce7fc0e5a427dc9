//! Runtime configuration.
//!
//! Configuration is validated at construction: a bad config is a fatal
//! startup error, never a per-request failure. Durations are written in
//! human-readable form (`30s`, `1m 30s`) in YAML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use muse_core::BackendId;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the generation runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Backend tried first when the caller does not request one.
    pub primary: BackendId,

    /// Deterministic alternate for the fallback tier. The cascade swaps
    /// between `primary` and `secondary` so the fallback never repeats
    /// the backend that just failed.
    pub secondary: BackendId,

    /// Backend for the degraded last-resort tier.
    pub last_resort: BackendId,

    /// Hard per-attempt timeout. The in-flight request is cancelled on
    /// expiry.
    #[serde(with = "humantime_duration")]
    pub request_timeout: Duration,

    /// Token cap for primary and fallback attempts.
    pub max_tokens: u32,

    /// Reduced token cap for the last-resort tier.
    pub reduced_max_tokens: u32,

    /// Sampling temperature sent to every backend.
    pub temperature: f32,

    /// Context window (in turns) for the last-resort tier. Tunable, not
    /// load-bearing.
    pub window_turns: usize,

    /// Optional system prompt prepended to every request.
    pub system_prompt: Option<String>,

    /// Endpoint used for any backend without an explicit override.
    pub endpoint_base: String,

    /// Per-backend endpoint overrides.
    pub endpoints: BTreeMap<BackendId, String>,

    /// Ask backends not to log or publish the exchange.
    pub private: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            primary: BackendId::Openai,
            secondary: BackendId::Mistral,
            last_resort: BackendId::Llama,
            request_timeout: Duration::from_secs(30),
            max_tokens: 1024,
            reduced_max_tokens: 256,
            temperature: 0.7,
            window_turns: 6,
            system_prompt: None,
            endpoint_base: "https://text.pollinations.ai/v1/generate".to_string(),
            endpoints: BTreeMap::new(),
            private: true,
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a YAML config document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary == self.secondary {
            return Err(ConfigError::Invalid(format!(
                "primary and secondary must differ (both '{}')",
                self.primary
            )));
        }
        // The degraded tier must not re-attempt a backend that already
        // failed earlier in the cascade.
        if self.last_resort == self.primary || self.last_resort == self.secondary {
            return Err(ConfigError::Invalid(format!(
                "last_resort '{}' must differ from primary and secondary",
                self.last_resort
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("request_timeout must be positive".into()));
        }
        if self.max_tokens == 0 || self.reduced_max_tokens == 0 {
            return Err(ConfigError::Invalid("token limits must be positive".into()));
        }
        if self.reduced_max_tokens > self.max_tokens {
            return Err(ConfigError::Invalid(format!(
                "reduced_max_tokens ({}) exceeds max_tokens ({})",
                self.reduced_max_tokens, self.max_tokens
            )));
        }
        if self.window_turns == 0 {
            return Err(ConfigError::Invalid("window_turns must be at least 1".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature {} outside [0, 2]",
                self.temperature
            )));
        }
        validate_url("endpoint_base", &self.endpoint_base)?;
        for (backend, url) in &self.endpoints {
            validate_url(&format!("endpoints.{backend}"), url)?;
        }
        Ok(())
    }

    /// Deterministic alternate for the fallback tier: swaps within the
    /// configured primary/secondary pair, so the result is always
    /// distinct from `used`.
    pub fn fallback_for(&self, used: BackendId) -> BackendId {
        if used == self.secondary {
            self.primary
        } else {
            self.secondary
        }
    }
}

fn validate_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must start with http:// or https:// (got '{url}')"
        )))
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
