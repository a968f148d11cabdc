mod config;
mod errors;
mod extraction;
mod ingest;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::ner::{HeuristicRecognizer, PersonNameRecognizer, RemoteRecognizer};
use crate::extraction::skills::SkillVocabulary;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sift API v{}", env!("CARGO_PKG_VERSION"));

    // Skill vocabulary is loaded once and shared read-only by every request
    let vocabulary = SkillVocabulary::load(&config.skills_path)
        .with_context(|| format!("Failed to load skill vocabulary from {}", config.skills_path))?;
    if vocabulary.is_empty() {
        warn!("Skill vocabulary is empty; skills will never be extracted");
    }

    let recognizer = build_recognizer(&config).await?;

    let state = AppState {
        config: config.clone(),
        vocabulary: Arc::new(vocabulary),
        recognizer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the person-name recognizer: the remote NER service when configured,
/// the in-process heuristic otherwise.
async fn build_recognizer(config: &Config) -> Result<Arc<dyn PersonNameRecognizer>> {
    match &config.ner_endpoint {
        Some(endpoint) => {
            let endpoint = endpoint.clone();
            let timeout = config.ner_timeout;
            // The blocking client owns its own runtime; build it off the async executor.
            let remote =
                tokio::task::spawn_blocking(move || RemoteRecognizer::new(endpoint, timeout))
                    .await
                    .context("spawn_blocking failed while building NER client")?
                    .context("Failed to build NER client")?;
            info!("Name recognizer: remote NER service at {}", remote.endpoint());
            Ok(Arc::new(remote))
        }
        None => {
            info!("Name recognizer: heuristic (NER_ENDPOINT not set)");
            Ok(Arc::new(HeuristicRecognizer))
        }
    }
}
