mod board;
mod config;
mod errors;
mod genai;
mod listings;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::board::JobBoard;
use crate::config::Config;
use crate::genai::GenAiClient;
use crate::listings::{GenAiJobSource, JobSource};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{FileStorage, SavedJobsStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobscout v{}", env!("CARGO_PKG_VERSION"));

    // Restore the saved collection from local storage
    let storage = FileStorage::new(config.data_dir.clone())?;
    let store = SavedJobsStore::new(Arc::new(storage));
    let saved = store.load();
    info!("Restored {} saved job(s) from {}", saved.len(), config.data_dir);

    // Initialize the GenAI-backed listing source
    let client = GenAiClient::new(config.gemini_api_key.clone(), config.genai_model.clone());
    let source: Arc<dyn JobSource> = Arc::new(GenAiJobSource::new(client));
    info!("GenAI client initialized (model: {})", config.genai_model);

    // Build app state
    let state = AppState {
        board: Arc::new(Mutex::new(JobBoard::new(saved))),
        source,
        store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the consuming UI runs on a separate origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
