//! Application-wide constants

pub const SESSION_COOKIE_NAME: &str = "cinematic_auth";
pub const SESSION_MARKER: &str = "authenticated:";
pub const SESSION_MAX_AGE_SECONDS: i64 = 60 * 60 * 24 * 7;

pub const LOGIN_PATH: &str = "/login";
pub const AUTH_API_PATH: &str = "/api/auth";
pub const HEALTH_PATH: &str = "/health";

pub const DEFAULT_AUTH_PASSWORD: &str = "demo123";
pub const DEFAULT_PIPELINE_URL: &str = "http://localhost:3001";
pub const DEFAULT_PIPELINE_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

pub const POLL_INTERVAL_SECONDS: u64 = 3;
pub const POLL_TIMEOUT_SECONDS: u64 = 10 * 60;
