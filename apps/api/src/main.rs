mod analysis;
mod chat;
mod config;
mod errors;
mod extract;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod state;
mod store;
mod upload;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::ChatResponder;
use crate::config::Config;
use crate::extract::engines::{PdfiumRasterizer, TesseractOcr};
use crate::extract::TextExtractor;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ContextStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (optional credential; absence means dev fallbacks)
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        info!("No generation API key configured; chat and scoring use dev fallbacks");
    }

    // Initialize the flat-file context store
    let store = ContextStore::open(&config.data_dir).await?;
    info!("Context store rooted at {}", config.data_dir.display());

    // Initialize the extraction cascade with the production engines
    let extractor = Arc::new(TextExtractor::new(
        Arc::new(PdfiumRasterizer),
        Arc::new(TesseractOcr),
        llm.clone(),
        &config,
    ));
    info!("Text extractor initialized (ocr_mode: {:?})", config.ocr_mode);

    // Build app state
    let state = AppState {
        llm: llm.clone(),
        extractor,
        store,
        responder: ChatResponder::new(llm),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
