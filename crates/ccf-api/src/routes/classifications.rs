//! Classification record endpoints

use crate::models::{ApiError, ApiResponse, Scope};
use crate::ApiState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ccf_common::ClassificationType;
use ccf_engine::NewClassification;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Classification routes
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_classifications).post(create_classification))
        .route(
            "/:id",
            get(get_classification)
                .put(update_classification)
                .delete(delete_classification),
        )
}

/// Type filter: one or more comma-separated type names
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Comma-separated protocol types to return
    pub c_type: Option<String>,
}

/// Create a classification
pub async fn create_classification(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Json(input): Json<NewClassification>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    let record = state.engine.create_classification(&scope, input)?;
    let payload = state.engine.present_classification(&record)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(payload))))
}

/// Fetch one classification with its resolved definition
pub async fn get_classification(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let record = state.engine.get_classification(&scope, id)?;
    let payload = state.engine.present_classification(&record)?;
    Ok(Json(ApiResponse::success(payload)))
}

/// Update a classification's name/description
pub async fn update_classification(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let record = state.engine.update_classification(&scope, id, &payload)?;
    let payload = state.engine.present_classification(&record)?;
    Ok(Json(ApiResponse::success(payload)))
}

/// Delete an unreferenced classification
pub async fn delete_classification(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_classification(&scope, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List classifications, optionally filtered by type
pub async fn list_classifications(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<Value>>>, ApiError> {
    let types = params
        .c_type
        .map(|raw| {
            raw.split(',')
                .map(|name| name.trim().parse::<ClassificationType>())
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let records = state.engine.list_classifications(&scope, types.as_deref());
    let mut payloads = Vec::with_capacity(records.len());
    for record in &records {
        payloads.push(state.engine.present_classification(record)?);
    }
    Ok(Json(ApiResponse::success(payloads)))
}
