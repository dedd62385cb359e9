//! OpenAI video generation adapter.
//!
//! ```text
//! POST {base}/v1/videos          create video job
//! GET  {base}/v1/videos/{id}     job status
//! ```
//!
//! Authenticates with `Authorization: Bearer <key>` and opts into the
//! model preview with `OpenAI-Beta: sora-2`.

use async_trait::async_trait;
use serde_json::{json, Value};
use vidgen_core::adapter::ProviderAdapter;
use vidgen_core::job::{
    Credential, JobHandle, JobRequest, PollOutcome, ProviderKind, TerminalResult,
};

use crate::http::{self, ProviderApiError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "sora-2";
pub const DEFAULT_SECONDS: u32 = 8;

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VALUE: &str = "sora-2";

/// Per-deployment settings for the OpenAI adapter.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub seconds: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            seconds: DEFAULT_SECONDS,
        }
    }
}

pub struct OpenAiAdapter {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiAdapter {
    /// Create an adapter reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// JSON body for `POST /v1/videos`.
    pub fn submission_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "prompt": prompt,
            "seconds": self.config.seconds,
        })
    }

    async fn create_video(&self, request: &JobRequest) -> Result<Value, ProviderApiError> {
        let response = self
            .client
            .post(format!("{}/v1/videos", self.base_url()))
            .bearer_auth(request.credential().expose())
            .header(BETA_HEADER, BETA_VALUE)
            .json(&self.submission_body(request.prompt()))
            .send()
            .await?;
        http::parse_json(response).await
    }

    async fn get_video(
        &self,
        video_id: &str,
        credential: &Credential,
    ) -> Result<Value, ProviderApiError> {
        let response = self
            .client
            .get(format!("{}/v1/videos/{video_id}", self.base_url()))
            .bearer_auth(credential.expose())
            .header(BETA_HEADER, BETA_VALUE)
            .send()
            .await?;
        http::parse_json(response).await
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, TerminalResult> {
        let payload = self
            .create_video(request)
            .await
            .map_err(|e| e.into_submit_result(ProviderKind::OpenAi.display_name()))?;

        let Some(id) = http::extract_job_id(&payload) else {
            tracing::warn!(provider = "openai", "No video job id in response");
            return Err(TerminalResult::provider_error("no job id in response"));
        };

        tracing::info!(provider = "openai", job_id = %id, "Video job created");
        Ok(JobHandle::new(ProviderKind::OpenAi, id))
    }

    async fn poll(
        &self,
        handle: &JobHandle,
        credential: &Credential,
    ) -> Result<PollOutcome, TerminalResult> {
        let payload = self
            .get_video(handle.provider_job_id(), credential)
            .await
            .map_err(ProviderApiError::into_poll_result)?;
        interpret_status(&payload)
    }
}

// ---------------------------------------------------------------------------
// Payload interpretation
// ---------------------------------------------------------------------------

/// Map a video job status payload to a poll outcome.
pub fn interpret_status(payload: &Value) -> Result<PollOutcome, TerminalResult> {
    match payload.get("status").and_then(Value::as_str) {
        Some("completed") | Some("succeeded") => extract_output_url(payload)
            .map(|video_url| PollOutcome::Succeeded { video_url })
            .ok_or_else(|| TerminalResult::provider_error("no output")),
        Some("failed") | Some("cancelled") => Ok(PollOutcome::Failed {
            reason: format!("Video generation failed: {}", error_reason(payload)),
        }),
        _ => Ok(PollOutcome::Pending),
    }
}

/// Output URL of a finished job: `data[0].url`, then top-level `url`.
/// Blank values count as missing.
pub fn extract_output_url(payload: &Value) -> Option<String> {
    let usable = |url: &&str| !url.trim().is_empty();
    payload
        .pointer("/data/0/url")
        .and_then(Value::as_str)
        .filter(usable)
        .or_else(|| payload.get("url").and_then(Value::as_str).filter(usable))
        .map(str::to_string)
}

fn error_reason(payload: &Value) -> String {
    match payload.get("error") {
        Some(Value::String(msg)) if !msg.is_empty() => msg.clone(),
        Some(err @ Value::Object(_)) => err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string()),
        _ => "Unknown error".to_string(),
    }
}
