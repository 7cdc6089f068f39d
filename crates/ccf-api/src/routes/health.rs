//! Liveness endpoint

use crate::models::ApiResponse;
use axum::Json;
use serde::Serialize;

/// Health payload
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Always "ok" while the process serves requests
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Service liveness probe
pub async fn health_check() -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
