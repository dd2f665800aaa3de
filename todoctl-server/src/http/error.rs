//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use todoctl_core::ValidationError;

use crate::auth::TokenError;
use crate::db::DbError;
use crate::service::ServiceError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Missing/bad token or wrong credentials (401)
    Unauthorized { message: String },

    /// Resource not found or not owned by the caller (404)
    NotFound { resource: &'static str, id: String },

    /// Username already taken (409)
    Conflict { message: String },

    /// Storage call exceeded its deadline (504)
    Timeout { millis: u64 },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "unauthorized",
                    "message": message
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Conflict { message } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": message
                }),
            ),
            Self::Timeout { millis } => (
                StatusCode::GATEWAY_TIMEOUT,
                json!({
                    "error": "timeout",
                    "message": format!("operation timed out after {}ms", millis)
                }),
            ),
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::DuplicateUsername(_) => Self::Conflict {
                message: e.to_string(),
            },
            DbError::InvalidCredential => Self::unauthorized(e.to_string()),
            DbError::Timeout { millis } => Self::Timeout { millis },
            _ => Self::Database(e),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid(_) => Self::unauthorized("invalid or expired token"),
            TokenError::Sign(_) | TokenError::Lifetime { .. } => Self::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(e) => e.into(),
            ServiceError::Store(e) => e.into(),
            ServiceError::Token(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::from(ServiceError::Validation(ValidationError::NoFieldsSet {
            fields: "title or description",
        }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "either title or description must be set");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::from(DbError::not_found("list", 9));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_errors_map_by_kind() {
        let status = |e: DbError| ApiError::from(e).into_response().status();

        assert_eq!(
            status(DbError::DuplicateUsername("ada".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(status(DbError::InvalidCredential), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(DbError::Timeout { millis: 10 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status(DbError::Sqlx(sqlx::Error::RowNotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn storage_detail_is_not_leaked() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::Protocol("boom".into())));
        let body = body_json(err.into_response()).await;
        assert_eq!(body["message"], "an internal error occurred");
    }
}
