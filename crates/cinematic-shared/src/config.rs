//! Configuration management

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    AUTH_API_PATH, DEFAULT_AUTH_PASSWORD, DEFAULT_PIPELINE_TIMEOUT_SECONDS,
    DEFAULT_PIPELINE_URL, HEALTH_PATH, LOGIN_PATH, SESSION_COOKIE_NAME, SESSION_MAX_AGE_SECONDS,
};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub auth: AuthSettings,
    pub pipeline: PipelineSettings,
    pub gate: GateSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub static_dir: String,
    pub cors_origins: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            name: "cinematic-server".to_string(),
            static_dir: "static".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthSettings {
    pub password: String,
    pub cookie_name: String,
    /// HMAC key for session tokens. A random per-process key is used when unset.
    pub session_secret: Option<String>,
    pub max_age_seconds: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            password: DEFAULT_AUTH_PASSWORD.to_string(),
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            session_secret: None,
            max_age_seconds: SESSION_MAX_AGE_SECONDS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PIPELINE_URL.to_string(),
            timeout_seconds: DEFAULT_PIPELINE_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GateSettings {
    pub login_path: String,
    pub public_prefixes: Vec<String>,
    pub asset_prefixes: Vec<String>,
    pub asset_extensions: Vec<String>,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            login_path: LOGIN_PATH.to_string(),
            public_prefixes: vec![
                LOGIN_PATH.to_string(),
                AUTH_API_PATH.to_string(),
                HEALTH_PATH.to_string(),
            ],
            asset_prefixes: vec!["/assets".to_string(), "/favicon".to_string()],
            asset_extensions: ["svg", "png", "jpg", "jpeg", "gif", "webp", "ico"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Unprefixed deployment variables that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct LegacyEnv {
    pub auth_password: Option<String>,
    pub pipeline_url: Option<String>,
    pub node_env: Option<String>,
}

impl LegacyEnv {
    pub fn from_process() -> Self {
        Self {
            auth_password: std::env::var("AUTH_PASSWORD").ok(),
            pipeline_url: std::env::var("PIPELINE_URL").ok(),
            node_env: std::env::var("NODE_ENV").ok(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::build(&env, LegacyEnv::from_process())
    }

    pub fn build(env: &str, legacy: LegacyEnv) -> Result<Self, ConfigError> {
        Self::build_with(Path::new("config"), env, legacy, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix("CINEMATIC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build_with(
        dir: &Path,
        env: &str,
        legacy: LegacyEnv,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let file = |name: &str| File::with_name(&dir.join(name).to_string_lossy()).required(false);
        let config = Config::builder()
            .add_source(file("default"))
            .add_source(file(env))
            .add_source(environment)
            .set_override_option("auth.password", legacy.auth_password)?
            .set_override_option("pipeline.base_url", legacy.pipeline_url)?
            .set_override_option("app.env", legacy.node_env)?
            .build()?;
        config.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }
}
