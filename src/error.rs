/*
 * Responsibility
 * - Application-wide AppError
 * - IntoResponse (HTTP status / JSON error body)
 * - AuthError -> 401 with a code naming the failure class
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized { code: &'static str },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
}

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            code: "UNAUTHORIZED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized { code } => {
                (StatusCode::UNAUTHORIZED, code, "unauthorized".into())
            }
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        // Details stay in the logs; the client only learns the class.
        AppError::Unauthorized { code: e.code() }
    }
}
