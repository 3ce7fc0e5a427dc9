//! HTTP boundary for the muse generation orchestration layer.
//!
//! Exposes the cascade and the recommendation engine to the surrounding
//! application:
//! - `POST /generate`: run the fallback cascade for a prompt
//! - `POST /recommend-backend`: rank backends for a prompt
//! - `GET /health`: liveness probe

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use muse_runtime::{
    ApiCredential, BackendRegistry, GenerationOrchestrator, HttpTextBackend, ResponseSynthesizer,
    RuntimeConfig, UrlSynthesizer,
};

mod routes;

/// Environment variable naming a YAML config file.
const CONFIG_ENV: &str = "MUSE_CONFIG";
/// Environment variable holding an optional backend bearer token.
const TOKEN_ENV: &str = "MUSE_API_TOKEN";
/// Environment variable overriding the listen address.
const ADDR_ENV: &str = "MUSE_ADDR";

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<GenerationOrchestrator>,
    pub synthesizer: Arc<dyn ResponseSynthesizer>,
}

fn load_config() -> anyhow::Result<RuntimeConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            tracing::info!(path = %path, "loading runtime config");
            Ok(RuntimeConfig::from_yaml_file(&path)?)
        }
        Err(_) => Ok(RuntimeConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("muse_server=info,muse_runtime=info,tower_http=info")),
        )
        .init();

    // Invalid configuration is fatal here, never a per-request failure.
    let config = load_config()?;
    let registry = BackendRegistry::from_config(&config)?;

    let mut backend = HttpTextBackend::new(registry);
    if let Some(credential) = ApiCredential::from_env(TOKEN_ENV) {
        tracing::info!(source = %credential.source(), "backend credential loaded");
        backend = backend.with_credential(credential);
    }

    let state = AppState {
        orchestrator: Arc::new(GenerationOrchestrator::new(Arc::new(backend), config)),
        synthesizer: Arc::new(UrlSynthesizer::default()),
    };

    let app = routes::router(state);

    let addr = std::env::var(ADDR_ENV).unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "muse server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
