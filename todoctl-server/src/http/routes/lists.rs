//! List endpoints, scoped to the authenticated user

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use todoctl_core::{NewList, TodoList, UpdateListInput};

use super::{Created, DataResponse, StatusResponse};
use crate::http::error::ApiError;
use crate::http::extractors::AuthUser;
use crate::http::server::AppState;

/// GET /lists
async fn list_lists(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DataResponse<TodoList>>, ApiError> {
    let data = state.service.lists.get_all(user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /lists
async fn create_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<NewList>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let id = state.service.lists.create(user_id, input).await?;
    tracing::debug!(user_id, list_id = id, "list created");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// GET /lists/{id}
async fn get_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<TodoList>, ApiError> {
    let list = state.service.lists.get_by_id(user_id, id).await?;
    Ok(Json(list))
}

/// PUT /lists/{id}
async fn update_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateListInput>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.service.lists.update(user_id, id, input).await?;
    Ok(Json(StatusResponse::success()))
}

/// DELETE /lists/{id}
async fn delete_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.service.lists.delete(user_id, id).await?;
    Ok(Json(StatusResponse::success()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lists", get(list_lists).post(create_list))
        .route(
            "/lists/{id}",
            get(get_list).put(update_list).delete(delete_list),
        )
}
