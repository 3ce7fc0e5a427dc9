//! One-shot command-line front end for the muse generation core.
//!
//! Useful for smoke-testing the cascade and the recommendation engine
//! without standing up the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use muse_core::{recommend, BackendId};
use muse_runtime::{
    ApiCredential, BackendRegistry, GenerateRequest, GenerationOrchestrator, HttpTextBackend,
    ResponseSynthesizer, RuntimeConfig, UrlSynthesizer,
};

#[derive(Parser)]
#[command(name = "muse", version, about = "muse generation orchestration CLI")]
struct Cli {
    /// Path to a YAML runtime config; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the fallback cascade for a prompt
    Generate {
        /// The prompt text
        prompt: String,

        /// Backend to try first (e.g. openai, mistral, llama)
        #[arg(long)]
        backend: Option<BackendId>,

        /// Voice id; prints a speech-synthesis URL for the response
        #[arg(long)]
        voice: Option<String>,

        /// Print the full cascade outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank candidate backends for a prompt
    Recommend {
        /// The prompt text
        prompt: String,
    },
}

fn load_config(path: Option<&str>) -> anyhow::Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("loading config from '{path}'")),
        None => Ok(RuntimeConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            prompt,
            backend,
            voice,
            json,
        } => {
            anyhow::ensure!(!prompt.trim().is_empty(), "prompt must not be empty");

            let registry = BackendRegistry::from_config(&config)?;
            let mut client = HttpTextBackend::new(registry);
            if let Some(credential) = ApiCredential::from_env("MUSE_API_TOKEN") {
                client = client.with_credential(credential);
            }
            let orchestrator = GenerationOrchestrator::new(Arc::new(client), config);

            let outcome = orchestrator
                .generate(GenerateRequest {
                    prompt,
                    history: Vec::new(),
                    backend,
                })
                .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.final_text);
                tracing::info!(tier = ?outcome.tier_used, attempts = outcome.attempts.len(), "cascade finished");
                if let Some(voice) = voice.as_deref().filter(|v| !v.trim().is_empty()) {
                    let audio = UrlSynthesizer::default().audio_reference(&outcome.final_text, voice);
                    println!("audio: {audio}");
                }
            }
        }

        Commands::Recommend { prompt } => {
            let ranking = recommend(&prompt);
            println!("detected: {}", ranking.features.join(", "));
            for score in &ranking.scores {
                println!(
                    "{:<10} {:>5.2}  {}",
                    score.backend,
                    score.score,
                    score.reasons.join("; ")
                );
            }
        }
    }

    Ok(())
}
