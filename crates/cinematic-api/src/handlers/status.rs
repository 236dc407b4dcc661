// ============================================================================
// Cinematic API - Status Handler
// File: crates/cinematic-api/src/handlers/status.rs
// ============================================================================
//! Job status relayed from the pipeline server

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::error;

use crate::error::ApiError;
use crate::pipeline::PipelineClient;

/// Status handler - GET /api/status/{job_id}
pub async fn poll(
    State(pipeline): State<Arc<dyn PipelineClient>>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let response = pipeline.status(&job_id).await.map_err(|e| {
        error!(job_id = %job_id, "Status check error: {}", e);
        ApiError::StatusUnavailable("Cannot connect to pipeline server".to_string())
    })?;

    Ok(Json(response))
}
