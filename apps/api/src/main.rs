mod analysis;
mod config;
mod errors;
mod flow;
mod llm_client;
mod models;
mod presenter;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::{GeminiAnalyzer, ResumeAnalyzer};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing GEMINI_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeAI API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        config.retry_policy(),
        config.llm_timeout(),
    )?
    .with_base_url(&config.gemini_api_base);
    info!(
        "LLM client initialized (model: {}, attempts: {})",
        llm_client::MODEL,
        llm.retry_policy().max_attempts
    );

    let analyzer: Arc<dyn ResumeAnalyzer> = Arc::new(GeminiAnalyzer::new(llm));

    // Build app state
    let state = AppState::new(config.clone(), analyzer);

    // Drop sessions nobody has touched within the TTL
    let sessions = state.sessions.clone();
    let ttl = state.config.session_ttl();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            sessions.prune_idle(ttl);
        }
    });

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
