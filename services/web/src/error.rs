//! Custom error types for the web service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the web service
#[derive(Error, Debug)]
pub enum AppError {
    /// No identity on a request that needs one
    #[error("Unauthorized")]
    Unauthorized,

    /// Credentials rejected by the auth provider
    #[error("Authentication failed: {0}")]
    Auth(#[from] crate::auth::AuthFailure),

    /// Realtime store error
    #[error("Store error: {0}")]
    Store(#[from] common::StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Auth(failure) if failure.code == crate::auth::AuthFailure::INTERNAL => {
                error!("Auth provider error: {}", failure);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Auth(failure) => (StatusCode::UNAUTHORIZED, failure.code),
            AppError::Store(common::StoreError::InvalidPath(msg)) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Store(e) => {
                error!("Store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Store error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for handler results
pub type AppResult<T> = Result<T, AppError>;
