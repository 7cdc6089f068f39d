//! Classification group endpoints

use crate::models::{ApiError, ApiResponse, Scope};
use crate::ApiState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ccf_engine::{GroupDetail, NewClassificationGroup};
use ccf_store::{ClassificationGroup, Page, SortKey};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Classification group routes
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/:id", get(get_group).put(update_group).delete(delete_group))
}

/// Pagination parameters for the group listing
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Sort key, name when absent
    pub sort: Option<SortKey>,
    /// Page size, unbounded when absent
    pub limit: Option<usize>,
    /// Id of the last item of the previous page
    pub marker: Option<Uuid>,
}

/// Create a group with its membership edges
pub async fn create_group(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Json(input): Json<NewClassificationGroup>,
) -> Result<(StatusCode, Json<ApiResponse<ClassificationGroup>>), ApiError> {
    let group = state.engine.create_group(&scope, input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(group))))
}

/// Fetch one group with fully resolved membership
pub async fn get_group(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GroupDetail>>, ApiError> {
    let detail = state.engine.get_group(&scope, id)?;
    Ok(Json(ApiResponse::success(detail)))
}

/// Paginated group listing
pub async fn list_groups(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Query(params): Query<PageParams>,
) -> Json<ApiResponse<Vec<ClassificationGroup>>> {
    let page = Page {
        sort: params.sort.unwrap_or_default(),
        limit: params.limit,
        marker: params.marker,
    };
    Json(ApiResponse::success(state.engine.list_groups(&scope, &page)))
}

/// Update a group's name/description
pub async fn update_group(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<ClassificationGroup>>, ApiError> {
    let group = state.engine.update_group(&scope, id, &payload)?;
    Ok(Json(ApiResponse::success(group)))
}

/// Delete a group that no other group nests
pub async fn delete_group(
    State(state): State<Arc<ApiState>>,
    Scope(scope): Scope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_group(&scope, id)?;
    Ok(StatusCode::NO_CONTENT)
}
