//! Generation request payload and the submit answer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Words spoken per second by the narrator voices.
const WORDS_PER_SECOND: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "1:1")]
    Square,
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "9:16" | "portrait" => Ok(Self::Portrait),
            "16:9" | "landscape" => Ok(Self::Landscape),
            "1:1" | "square" => Ok(Self::Square),
            other => Err(format!("unknown aspect ratio '{}' (9:16, 16:9 or 1:1)", other)),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = match self {
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
            Self::Square => "1:1",
        };
        f.write_str(ratio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaType {
    #[default]
    AiVideo,
    AiImages,
    Stock,
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ai-video" => Ok(Self::AiVideo),
            "ai-images" => Ok(Self::AiImages),
            "stock" => Ok(Self::Stock),
            other => Err(format!(
                "unknown media type '{}' (ai-video, ai-images or stock)",
                other
            )),
        }
    }
}

/// Body of `POST /api/generate`. The server forwards it to the pipeline untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub script: String,
    pub aspect_ratio: AspectRatio,
    pub media_type: MediaType,
    pub preset: String,
    pub voice: String,
}

impl GenerationRequest {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            aspect_ratio: AspectRatio::default(),
            media_type: MediaType::default(),
            preset: "Default".to_string(),
            voice: "Narrator (Male)".to_string(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.script.split_whitespace().count()
    }

    /// Rough narration length in whole seconds.
    pub fn estimated_duration_secs(&self) -> u64 {
        (self.word_count() as f64 / WORDS_PER_SECOND).ceil() as u64
    }
}

/// Answer to a submit, in the pipeline's own `{success, jobId?, error?}` convention.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    pub job_id: Option<String>,
    pub error: Option<String>,
}
