use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cinematic_security::SessionCookie;
use cinematic_shared::constants::{SESSION_COOKIE_NAME, SESSION_MAX_AGE_SECONDS};
use reqwest::{
    header::{COOKIE, SET_COOKIE},
    redirect, Client, RequestBuilder, Response, StatusCode, Url,
};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ClientError;
use crate::job::StatusUpdate;
use crate::poller::StatusSource;
use crate::request::{GenerationRequest, SubmitResponse};

/// Client for the front end's API. Keeps the session cookie in memory only.
#[derive(Clone)]
pub struct CinematicClient {
    http: Client,
    base_url: Url,
    cookie: SessionCookie,
    session: Arc<RwLock<Option<String>>>,
}

impl CinematicClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_cookie_name(base_url, SESSION_COOKIE_NAME)
    }

    pub fn with_cookie_name(base_url: &str, cookie_name: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        // Redirects are how the gate says "log in first"; surface them instead of following.
        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url,
            cookie: SessionCookie::new(cookie_name, SESSION_MAX_AGE_SECONDS, false),
            session: Arc::new(RwLock::new(None)),
        })
    }

    pub async fn is_logged_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// POST /api/auth
    pub async fn login(&self, password: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "auth"])?;
        let response = self
            .http
            .post(url)
            .json(&json!({ "password": password }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let token = response
                    .headers()
                    .get_all(SET_COOKIE)
                    .iter()
                    .filter_map(|value| value.to_str().ok())
                    .find_map(|value| self.cookie.find_in_set_cookie(value))
                    .map(str::to_string)
                    .ok_or(ClientError::MissingSessionCookie)?;
                *self.session.write().await = Some(token);
                debug!("Logged in to {}", self.base_url);
                Ok(())
            }
            StatusCode::UNAUTHORIZED => Err(ClientError::InvalidCredentials),
            _ => Err(unexpected(response).await),
        }
    }

    /// DELETE /api/auth. The local session is dropped whatever the server answers.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "auth"])?;
        let request = self.authorized(self.http.delete(url)).await;
        self.session.write().await.take();

        let response = request.send().await?;
        if response.status() != StatusCode::OK {
            return Err(unexpected(response).await);
        }
        Ok(())
    }

    /// POST /api/generate, returning the pipeline's job id.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<String, ClientError> {
        let url = self.endpoint(&["api", "generate"])?;
        let response = self
            .authorized(self.http.post(url).json(request))
            .await
            .send()
            .await?;

        let status = response.status();
        if status.is_redirection() {
            return Err(ClientError::Unauthenticated);
        }

        let body: SubmitResponse = response.json().await?;
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::Unavailable(body.error.unwrap_or_default()));
        }
        if !body.success {
            return Err(ClientError::Rejected(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        body.job_id.ok_or_else(|| {
            ClientError::Rejected("pipeline accepted the request without a job id".to_string())
        })
    }

    /// GET /api/status/{job_id}
    pub async fn status(&self, job_id: &str) -> Result<StatusUpdate, ClientError> {
        let url = self.endpoint(&["api", "status", job_id])?;
        let response = self.authorized(self.http.get(url)).await.send().await?;

        let status = response.status();
        if status.is_redirection() {
            return Err(ClientError::Unauthenticated);
        }

        let update: StatusUpdate = response.json().await?;
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::Unavailable(update.error.unwrap_or_default()));
        }
        Ok(update)
    }

    async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.read().await.as_deref() {
            Some(token) => builder.header(COOKIE, format!("{}={}", self.cookie.name, token)),
            None => builder,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl StatusSource for CinematicClient {
    async fn fetch_status(&self, job_id: &str) -> Result<StatusUpdate, ClientError> {
        self.status(job_id).await
    }
}

async fn unexpected(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClientError::UnexpectedResponse { status, body }
}
