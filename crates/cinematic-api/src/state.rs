use std::sync::Arc;

use axum::extract::FromRef;
use cinematic_security::{SessionCodec, SessionCookie};
use cinematic_shared::{AppConfig, AppError};
use tracing::warn;

use crate::middleware::AuthGate;
use crate::pipeline::{HttpPipelineClient, PipelineClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionCodec>,
    pub cookie: Arc<SessionCookie>,
    pub gate: Arc<AuthGate>,
    pub pipeline: Arc<dyn PipelineClient>,
}

impl AppState {
    pub fn new(config: AppConfig, pipeline: Arc<dyn PipelineClient>) -> Result<Self, AppError> {
        let max_age = config.auth.max_age_seconds;
        let sessions = match config.auth.session_secret.as_deref() {
            Some(secret) if !secret.is_empty() => SessionCodec::new(secret.as_bytes(), max_age),
            _ => {
                warn!("auth.session_secret is not set; sessions will not survive a restart");
                SessionCodec::with_random_key(max_age)
            }
        }
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        if config.auth.password == cinematic_shared::constants::DEFAULT_AUTH_PASSWORD
            && config.is_production()
        {
            warn!("Running in production with the default login password");
        }

        let cookie = SessionCookie::from_settings(&config.auth, config.is_production());
        let gate = AuthGate::new(&config.gate);

        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            cookie: Arc::new(cookie),
            gate: Arc::new(gate),
            pipeline,
        })
    }

    /// State wired to the real pipeline server from `pipeline.base_url`.
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let pipeline = HttpPipelineClient::new(&config.pipeline)
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        Self::new(config, Arc::new(pipeline))
    }
}

impl FromRef<AppState> for Arc<dyn PipelineClient> {
    fn from_ref(state: &AppState) -> Self {
        state.pipeline.clone()
    }
}
