use std::time::Duration;

use async_trait::async_trait;
use cinematic_shared::config::PipelineSettings;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::debug;

use super::{PipelineClient, PipelineError};

/// Pipeline client over plain HTTP. No retries: every failure is reported once.
#[derive(Clone)]
pub struct HttpPipelineClient {
    client: Client,
    base_url: Url,
}

impl HttpPipelineClient {
    pub fn new(settings: &PipelineSettings) -> Result<Self, PipelineError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| PipelineError::InvalidUrl(format!("{}: {}", settings.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PipelineError::InvalidUrl(settings.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| PipelineError::Client(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL. Each segment is percent-encoded on its own,
    /// so a job id containing `/` stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PipelineError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PipelineError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_body(response: Response) -> Result<Value, PipelineError> {
        debug!(status = %response.status(), url = %response.url(), "Pipeline responded");
        response
            .json::<Value>()
            .await
            .map_err(|e| PipelineError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PipelineClient for HttpPipelineClient {
    async fn submit(&self, payload: &Value) -> Result<Value, PipelineError> {
        let url = self.endpoint(&["generate"])?;
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| PipelineError::Unreachable(e.to_string()))?;

        Self::read_body(response).await
    }

    async fn status(&self, job_id: &str) -> Result<Value, PipelineError> {
        let url = self.endpoint(&["status", job_id])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Unreachable(e.to_string()))?;

        Self::read_body(response).await
    }
}
