//! Castlist Server
//!
//! HTTP boundary for the actor extraction service. Wires the SQLite
//! store, the completion client, and the extraction pipeline into an
//! axum application with session-scoped listing.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod service;
pub mod session;

use castlist_extractor::Extractor;
use castlist_llm::openai::OpenAiClient;
use castlist_llm::LlmError;
use castlist_store::{SqliteStore, StoreError};
use config::ServerConfig;
use handlers::{create_router, AppState};
use service::ActorService;
use session::SessionManager;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database error
    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// Completion client error
    #[error("Completion client error: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Opens the database, builds the extraction pipeline against the
/// configured completion endpoint, and serves the axum application.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Castlist server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database path: {}", config.database_path);
    info!("Completion model: {}", config.openai.model);

    let store = SqliteStore::new(&config.database_path)?;
    let store = Arc::new(Mutex::new(store));

    let client = OpenAiClient::new(
        &config.openai.endpoint,
        &config.openai.api_key,
        &config.openai.model,
    )?;
    let extractor = Extractor::new(client, config.extractor.clone());

    let state = AppState {
        service: Arc::new(ActorService::new(store, extractor)),
        sessions: Arc::new(SessionManager::new(
            &config.session_secret,
            config.token_expiry_secs,
        )),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
