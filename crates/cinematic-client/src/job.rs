//! Client-side view of one generation job

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Idle,
    Generating,
    Complete,
    Error,
    TimedOut,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error | Self::TimedOut)
    }
}

/// One answer of `GET /api/status/{job_id}`. Only the fields the view model reads are typed.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_progress")]
    pub progress: Option<f64>,
    pub message: Option<String>,
    pub video_url: Option<String>,
    pub error: Option<String>,
}

/// The pipeline owns the progress format. Numbers and numeric strings such as `"40%"` are
/// read; anything else is dropped instead of failing the whole update.
fn lenient_progress<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
    .filter(|p: &f64| p.is_finite()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub progress: Option<u8>,
    pub message: Option<String>,
    pub video_url: Option<String>,
    pub error: Option<String>,
}

impl Job {
    /// A job the pipeline has just accepted.
    pub fn submitted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Generating,
            progress: None,
            message: None,
            video_url: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Fold a status answer into the view. Terminal jobs no longer change.
    pub fn apply(&mut self, update: &StatusUpdate) {
        if self.is_terminal() {
            return;
        }

        match update.status.as_str() {
            "complete" => {
                self.status = JobStatus::Complete;
                self.progress = Some(100);
                self.video_url = update.video_url.clone();
            }
            "error" => {
                self.status = JobStatus::Error;
                self.error = update
                    .error
                    .clone()
                    .or_else(|| update.message.clone())
                    .or_else(|| Some("Generation failed".to_string()));
            }
            _ => {
                self.status = JobStatus::Generating;
                if let Some(progress) = update.progress {
                    self.progress = Some(progress.clamp(0.0, 100.0).round() as u8);
                }
                if update.message.is_some() {
                    self.message = update.message.clone();
                }
            }
        }
    }

    pub fn time_out(&mut self, after: Duration) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::TimedOut;
        self.error = Some(format!(
            "No final status after {} seconds; stopped polling",
            after.as_secs()
        ));
    }
}
