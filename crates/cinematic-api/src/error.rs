use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::{ApiResponse, StatusFailure};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Generation unavailable: {0}")]
    GenerateUnavailable(String),

    #[error("Status unavailable: {0}")]
    StatusUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidCredentials => {
                tracing::warn!("Login rejected: invalid password");
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ApiResponse::error("Invalid password")),
                )
                    .into_response()
            }
            ApiError::MalformedRequest(detail) => {
                tracing::warn!("Malformed request: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("Server error")),
                )
                    .into_response()
            }
            ApiError::GenerateUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, Json(ApiResponse::error(msg))).into_response()
            }
            ApiError::StatusUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, Json(StatusFailure::new(msg))).into_response()
            }
        }
    }
}
