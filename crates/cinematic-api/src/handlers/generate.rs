// ============================================================================
// Cinematic API - Generate Handler
// File: crates/cinematic-api/src/handlers/generate.rs
// ============================================================================
//! Generation submit relayed to the pipeline server

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Generation handler - POST /api/generate
///
/// Relays the caller's JSON to the pipeline and its JSON back, both unmodified.
pub async fn submit(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let unavailable = || ApiError::GenerateUnavailable(connect_hint(&state.config.pipeline.base_url));

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Unreadable generation request: {}", e);
        unavailable()
    })?;

    let response = state.pipeline.submit(&payload).await.map_err(|e| {
        error!("Pipeline connection error: {}", e);
        unavailable()
    })?;

    Ok(Json(response))
}

fn connect_hint(base_url: &str) -> String {
    let address = base_url
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');
    format!(
        "Cannot connect to pipeline server. Make sure it is running on {}",
        address
    )
}
