//! Response bodies produced by this service (relayed pipeline bodies are passed through as-is)

use serde::Serialize;

/// `{success, error?}` used by the login endpoint and synthesized generate failures.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// `{status: "error", error}` in the pipeline's status vocabulary.
#[derive(Debug, Serialize)]
pub struct StatusFailure {
    pub status: &'static str,
    pub error: String,
}

impl StatusFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            error: message.into(),
        }
    }
}
