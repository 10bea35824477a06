use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::editing::error::EditError;
use crate::editing::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Session limit reached: {0}")]
    SessionLimit(usize),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Rejected edits never touch the session; they are logged and reported.
impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        tracing::warn!("Rejected edit: {err}");
        match err {
            EditError::InvalidPath { .. }
            | EditError::InvalidDate { .. }
            | EditError::InvalidThemeColor { .. } => AppError::Validation(err.to_string()),
            EditError::PathNotFound { .. }
            | EditError::TypeMismatch { .. }
            | EditError::DuplicateId { .. }
            | EditError::ImmutableId { .. } => AppError::UnprocessableEntity(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::Full(capacity) => AppError::SessionLimit(capacity),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::SessionLimit(capacity) => {
                tracing::error!("Session limit of {capacity} reached");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SESSION_LIMIT",
                    "Too many open editor sessions".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
