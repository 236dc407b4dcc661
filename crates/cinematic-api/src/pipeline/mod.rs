//! Capability interface for the external pipeline server

pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpPipelineClient;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Cannot reach pipeline server: {0}")]
    Unreachable(String),

    #[error("Pipeline returned an unreadable body: {0}")]
    InvalidResponse(String),

    #[error("Invalid pipeline URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// The pipeline owns job semantics; implementations return its JSON bodies untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PipelineClient: Send + Sync {
    /// `POST /generate` with the caller's payload.
    async fn submit(&self, payload: &Value) -> Result<Value, PipelineError>;

    /// `GET /status/{job_id}`.
    async fn status(&self, job_id: &str) -> Result<Value, PipelineError>;
}
