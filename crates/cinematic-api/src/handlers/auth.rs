// ============================================================================
// Cinematic API - Auth Handlers
// File: crates/cinematic-api/src/handlers/auth.rs
// ============================================================================
//! Login/logout handlers for the shared password

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use cinematic_security::PasswordService;
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Login handler - POST /api/auth
///
/// The body is read as raw bytes so a missing `Content-Type` is not a rejection.
/// Anything but a JSON object is malformed; a missing or non-string password is just wrong.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;
    let fields = payload
        .as_object()
        .ok_or_else(|| ApiError::MalformedRequest("login body is not a JSON object".to_string()))?;

    let provided = fields
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !PasswordService::verify(provided, &state.config.auth.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.sessions.issue();
    info!("Login succeeded, session cookie issued");

    Ok((
        [(header::SET_COOKIE, state.cookie.set_header(&token))],
        Json(ApiResponse::success()),
    )
        .into_response())
}

/// Logout handler - DELETE /api/auth
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, state.cookie.clear_header())],
        Json(ApiResponse::success()),
    )
        .into_response()
}
