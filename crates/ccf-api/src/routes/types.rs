//! Schema discovery endpoint

use crate::models::ApiResponse;
use crate::ApiState;
use axum::extract::State;
use axum::Json;
use ccf_engine::ClassificationTypeInfo;
use std::sync::Arc;

/// The schema registry contents: type name plus its legal field list
pub async fn list_types(
    State(state): State<Arc<ApiState>>,
) -> Json<ApiResponse<Vec<ClassificationTypeInfo>>> {
    Json(ApiResponse::success(state.engine.classification_types()))
}
