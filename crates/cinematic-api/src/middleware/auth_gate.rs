//! Session gate in front of every route

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use cinematic_security::{SessionCodec, TokenError};
use cinematic_shared::config::GateSettings;
use tracing::{debug, warn};

use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthGate {
    login_path: String,
    public_prefixes: Vec<String>,
    asset_prefixes: Vec<String>,
    asset_extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    RedirectToLogin,
    ClearAndRedirect(TokenError),
}

impl AuthGate {
    pub fn new(settings: &GateSettings) -> Self {
        Self {
            login_path: settings.login_path.clone(),
            public_prefixes: settings.public_prefixes.clone(),
            asset_prefixes: settings.asset_prefixes.clone(),
            asset_extensions: settings
                .asset_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Public pages, the auth endpoint and static assets skip the session check.
    pub fn is_exempt(&self, path: &str) -> bool {
        let prefixed = |prefixes: &[String]| prefixes.iter().any(|p| path.starts_with(p.as_str()));
        if prefixed(&self.public_prefixes) || prefixed(&self.asset_prefixes) {
            return true;
        }

        let file_name = path.rsplit('/').next().unwrap_or_default();
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                self.asset_extensions.iter().any(|allowed| *allowed == ext)
            }
            _ => false,
        }
    }

    pub fn decide(&self, path: &str, session: Option<&str>, codec: &SessionCodec) -> GateDecision {
        if self.is_exempt(path) {
            return GateDecision::Pass;
        }

        let Some(token) = session else {
            return GateDecision::RedirectToLogin;
        };

        match codec.decode(token) {
            Ok(_) => GateDecision::Pass,
            Err(e) => GateDecision::ClearAndRedirect(e),
        }
    }
}

pub async fn auth_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let session = request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| state.cookie.find(cookies));

    match state.gate.decide(&path, session, &state.sessions) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::RedirectToLogin => {
            debug!(path = %path, "No session cookie, redirecting to login");
            Redirect::temporary(state.gate.login_path()).into_response()
        }
        GateDecision::ClearAndRedirect(reason) => {
            warn!(path = %path, reason = %reason, "Invalid session cookie cleared");
            (
                AppendHeaders([(header::SET_COOKIE, state.cookie.clear_header())]),
                Redirect::temporary(state.gate.login_path()),
            )
                .into_response()
        }
    }
}
