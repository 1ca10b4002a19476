//! Interview Relay - stateful mock-interview service
//!
//! Relays candidate answers to a streaming Gemini model and keeps each
//! session's conversation history in SQLite.

mod api;
mod config;
mod db;
mod interview;
mod llm;
mod system_prompt;

use api::{create_router, AppState};
use axum::http::{HeaderValue, Method};
use config::AppConfig;
use db::Database;
use interview::{DatabaseStore, ProductionEngine, ServiceCompletionClient};
use llm::{GeminiService, LoggingService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interview_relay=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Initialize database
    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;

    // Initialize completion backend
    let gemini = GeminiService::new(
        config.gemini_api_key.clone(),
        &config.gemini_model,
        config.gemini_base_url.as_deref(),
    )?;
    let service = Arc::new(LoggingService::new(Arc::new(gemini)));
    tracing::info!(model = %config.gemini_model, "Gemini client initialized");

    let mut engine = ProductionEngine::new(
        DatabaseStore::new(db),
        ServiceCompletionClient::new(service),
    );
    if config.serialize_sessions {
        tracing::info!("Per-session turn serialization enabled");
        engine = engine.with_session_locks();
    }

    // Create application state
    let state = AppState::new(Arc::new(engine));

    // Create router
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Interview relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
