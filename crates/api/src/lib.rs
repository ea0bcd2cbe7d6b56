//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for payments, balances and health
//! - Request id propagation, echoed back as the correlation id
//! - Mapping of payment errors to HTTP responses

pub mod response;
pub mod routes;

use axum::Router;
use axum::http::HeaderName;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use paylane_db::TransferEngine;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Engine that owns every funds movement.
    pub engine: Arc<TransferEngine>,
}

impl AppState {
    /// Builds state around an engine sharing the given pool.
    #[must_use]
    pub fn new(db: DatabaseConnection, engine: TransferEngine) -> Self {
        Self {
            db: Arc::new(db),
            engine: Arc::new(engine),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}
