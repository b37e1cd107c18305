use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;

use super::api::{self, AppState};
use super::events::{self, BoardEvent};
use super::state::{BoardHandle, BoardState};
use crate::config::IdStrategy;
use crate::storage::JsonFileStore;

/// Configuration for the dashboard server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub id_strategy: IdStrategy,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3142,
            data_file: PathBuf::from(".jobboard/jobs.json"),
            id_strategy: IdStrategy::Uuid,
            dev_mode: false,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the full application router with the JSON API and the event socket.
pub fn build_router(state: Arc<AppState>) -> Router {
    let events_tx = state.events_tx.clone();

    api::api_router()
        .route(
            "/ws",
            get(move |ws_upgrade| events::ws_handler(ws_upgrade, events_tx)),
        )
        .with_state(state)
}

/// Open the collection at `config.data_file` and wrap it for the handlers.
pub fn build_state(config: &ServerConfig) -> Result<Arc<AppState>> {
    let store = JsonFileStore::open(&config.data_file)
        .with_context(|| format!("Failed to open {}", config.data_file.display()))?;
    let ids = config.id_strategy.generator(store.jobs());
    let (events_tx, _rx) = broadcast::channel::<BoardEvent>(256);

    Ok(Arc::new(AppState {
        board: BoardHandle::new(BoardState::new(store, ids)),
        events_tx,
    }))
}

/// Start the dashboard server and run until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let state = build_state(&config)?;
    let mut app = build_router(state);

    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, data_file = %config.data_file.display(), "dashboard listening");
    println!("Job board running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}
