//! Sign-up and sign-in endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use todoctl_core::{NewUser, SignInInput};

use super::Created;
use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /auth/sign-up
async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let id = state.service.auth.sign_up(input).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// POST /auth/sign-in
///
/// Unknown usernames answer like wrong passwords.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SignInInput>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .service
        .auth
        .sign_in(input)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::NotFound { .. } => ApiError::unauthorized("invalid username or password"),
            other => other,
        })?;

    Ok(Json(TokenResponse { token }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
}
