//! REST API over the viability model.
//!
//! Handlers are stateless apart from the server's default assumptions:
//! - `GET /assumptions` returns the defaults
//! - `POST /evaluate` runs a full evaluation
//! - `POST /costs/installation` and `POST /costs/maintenance` price a system
//!   without evaluating it

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::model::types::Assumptions;

pub use types::{
    ErrorResponse, EvaluateRequest, InstallationCostRequest, MaintenanceCostRequest,
};

/// Immutable application state shared across all request handlers.
pub struct AppState {
    /// Assumptions applied when a request omits its own.
    pub defaults: Assumptions,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/assumptions", get(handlers::get_assumptions))
        .route("/evaluate", post(handlers::post_evaluate))
        .route("/costs/installation", post(handlers::post_installation_cost))
        .route("/costs/maintenance", post(handlers::post_maintenance_cost))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
