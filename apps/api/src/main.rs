mod config;
mod errors;
mod extract;
mod listings;
mod providers;
mod resume;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::providers::ExtractionClient;
use crate::routes::build_router;
use crate::session::InMemoryResumeStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume assistant API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the extraction client. Missing keys only disable the
    // corresponding provider's commands.
    let llm = ExtractionClient::new(
        config.mistral_api_key.clone(),
        config.gemini_api_key.clone(),
    );
    let available = llm.available();
    if available.is_empty() {
        warn!("No provider API key configured; extraction commands will be unavailable");
    } else {
        info!("Extraction providers configured: {available:?}");
    }

    // In-memory session store: one resume record per user, process lifetime.
    let store = Arc::new(InMemoryResumeStore::new());

    let state = AppState { store, llm };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
