//! HTTP dashboard for the job board.
//!
//! Serves the board as JSON over axum and pushes change events to connected
//! dashboards over a WebSocket. Every mutation goes through the same pure
//! collection operations as the CLI, behind a single-writer [`BoardHandle`].

pub mod api;
pub mod events;
#[allow(clippy::module_inception)]
pub mod server;
pub mod state;

pub use server::{ServerConfig, build_router, start_server};
pub use state::{BoardHandle, BoardState};
