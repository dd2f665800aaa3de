//! Item endpoints, scoped through the list the item belongs to

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use todoctl_core::{NewItem, TodoItem, UpdateItemInput};

use super::{Created, DataResponse, StatusResponse};
use crate::http::error::ApiError;
use crate::http::extractors::AuthUser;
use crate::http::server::AppState;

/// GET /lists/{id}/items
async fn list_items(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<i32>,
) -> Result<Json<DataResponse<TodoItem>>, ApiError> {
    let data = state.service.items.get_all(user_id, list_id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /lists/{id}/items
async fn create_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<i32>,
    Json(input): Json<NewItem>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let id = state.service.items.create(user_id, list_id, input).await?;
    tracing::debug!(user_id, list_id, item_id = id, "item created");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// GET /items/{id}
async fn get_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<TodoItem>, ApiError> {
    let item = state.service.items.get_by_id(user_id, id).await?;
    Ok(Json(item))
}

/// PUT /items/{id}
async fn update_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateItemInput>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.service.items.update(user_id, id, input).await?;
    Ok(Json(StatusResponse::success()))
}

/// DELETE /items/{id}
async fn delete_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.service.items.delete(user_id, id).await?;
    Ok(Json(StatusResponse::success()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lists/{id}/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
