//! HTTP payment API.
//!
//! The game-server payment detector calls these endpoints to report in-game
//! currency transfers; the endpoints run the same core operations as the
//! Discord commands. Request bodies are validated into typed schemas before
//! any business logic runs.

mod error;
mod routes;

pub use error::ApiError;

use crate::config::Settings;
use crate::core::Shop;
use crate::errors::Result;
use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shop state shared with the bot
    pub shop: Arc<Shop>,
    /// Runtime settings (payment target)
    pub settings: Arc<Settings>,
}

/// Builds the API router.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/create_order", post(routes::create_order))
        .route("/verify_payment", post(routes::verify_payment))
        .route("/direct_payment", post(routes::direct_payment))
        .route("/redeem_code", post(routes::redeem_code))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the API server until the process exits.
///
/// # Errors
/// Returns an error when the listen socket cannot be bound or the server
/// fails while serving.
pub async fn run_server(state: AppState, port: u16) -> Result<()> {
    let router = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("payment API listening on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
