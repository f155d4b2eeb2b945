//! Error responses for sametha-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sametha_common::Error as CommonError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller identity missing or unreadable (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Error raised by the annotation core
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Common(err) => match err {
                CommonError::Validation { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED")
                }
                CommonError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                CommonError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                CommonError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
                CommonError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
