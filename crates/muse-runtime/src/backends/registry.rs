//! Endpoint resolution for the closed backend set.
//!
//! Built once at startup from configuration; read-only afterwards. Every
//! supported backend resolves to an endpoint (explicit override or the
//! configured base), so resolution cannot fail at call time.

use std::collections::BTreeMap;

use muse_core::BackendId;

use crate::config::{ConfigError, RuntimeConfig};

/// Static mapping of backend id to endpoint URL.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    endpoints: BTreeMap<BackendId, String>,
}

impl BackendRegistry {
    /// Resolve endpoints for all supported backends from config.
    ///
    /// The config's URLs were already validated; this re-checks overrides
    /// so a registry can also be built from a hand-assembled config.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, ConfigError> {
        let mut endpoints = BTreeMap::new();
        for backend in BackendId::ALL {
            let url = config
                .endpoints
                .get(&backend)
                .cloned()
                .unwrap_or_else(|| config.endpoint_base.clone());
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "endpoint for '{backend}' must start with http:// or https:// (got '{url}')"
                )));
            }
            endpoints.insert(backend, url);
        }
        Ok(Self { endpoints })
    }

    /// Endpoint for a backend. Total: construction inserted every
    /// `BackendId` variant.
    pub fn endpoint(&self, backend: BackendId) -> &str {
        &self.endpoints[&backend]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_backend_resolves() {
        let registry = BackendRegistry::from_config(&RuntimeConfig::default()).unwrap();
        for backend in BackendId::ALL {
            assert!(registry.endpoint(backend).starts_with("https://"));
        }
    }

    #[test]
    fn test_override_takes_precedence() {
        let mut config = RuntimeConfig::default();
        config
            .endpoints
            .insert(BackendId::Llama, "http://localhost:8080/generate".to_string());

        let registry = BackendRegistry::from_config(&config).unwrap();
        assert_eq!(registry.endpoint(BackendId::Llama), "http://localhost:8080/generate");
        assert_eq!(registry.endpoint(BackendId::Openai), config.endpoint_base);
    }

    #[test]
    fn test_bad_override_rejected() {
        let mut config = RuntimeConfig::default();
        config
            .endpoints
            .insert(BackendId::Unity, "unix:///tmp/socket".to_string());

        assert!(BackendRegistry::from_config(&config).is_err());
    }
}
