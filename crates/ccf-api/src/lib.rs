//! CCF API - REST surface for the classification framework
//!
//! Exposes classification records, classification groups and the schema
//! registry over HTTP. The wire protocol is a thin layer: every operation
//! delegates to the [`ClassifierEngine`], requests are scoped by the
//! `x-project-id` header, and engine errors map onto 400/404/409 responses.

#![warn(missing_docs)]

pub mod models;
pub mod routes;

use axum::routing::get;
use axum::Router;
use ccf_engine::ClassifierEngine;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use models::{ApiError, ApiResponse, ErrorResponse, Scope};

/// API state shared by every route
#[derive(Clone)]
pub struct ApiState {
    /// The classifier engine behind the API
    pub engine: Arc<ClassifierEngine>,
}

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/classifications", routes::classifications::router())
        .nest("/classification-groups", routes::groups::router())
        .route("/classification-types", get(routes::types::list_types))
}
