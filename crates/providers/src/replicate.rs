//! Replicate predictions API adapter.
//!
//! ```text
//! POST {base}/v1/predictions          create prediction
//! GET  {base}/v1/predictions/{id}     prediction status
//! ```
//!
//! Authenticates with `Authorization: Token <key>`.

use async_trait::async_trait;
use serde_json::{json, Value};
use vidgen_core::adapter::ProviderAdapter;
use vidgen_core::job::{
    Credential, JobHandle, JobRequest, PollOutcome, ProviderKind, TerminalResult,
};

use crate::http::{self, ProviderApiError};

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com";
pub const DEFAULT_MODEL_VERSION: &str = "openai/sora-2";
pub const DEFAULT_SECONDS: u32 = 8;
pub const DEFAULT_ASPECT_RATIO: &str = "landscape";

/// Per-deployment settings for the Replicate adapter.
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub base_url: String,
    pub model_version: String,
    pub seconds: u32,
    pub aspect_ratio: String,
    /// Upstream OpenAI key forwarded in the prediction input, if set.
    pub openai_api_key: Option<Credential>,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            seconds: DEFAULT_SECONDS,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            openai_api_key: None,
        }
    }
}

pub struct ReplicateAdapter {
    client: reqwest::Client,
    config: ReplicateConfig,
}

impl ReplicateAdapter {
    /// Create an adapter reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ReplicateConfig) -> Self {
        Self { client, config }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn auth_header(credential: &Credential) -> String {
        format!("Token {}", credential.expose())
    }

    /// JSON body for `POST /v1/predictions`.
    pub fn submission_body(&self, prompt: &str) -> Value {
        let mut input = json!({
            "prompt": prompt,
            "seconds": self.config.seconds,
            "aspect_ratio": self.config.aspect_ratio,
        });
        if let Some(key) = self.config.openai_api_key.as_ref().filter(|k| !k.is_empty()) {
            input["openai_api_key"] = Value::String(key.expose().to_string());
        }
        json!({
            "version": self.config.model_version,
            "input": input,
        })
    }

    async fn create_prediction(&self, request: &JobRequest) -> Result<Value, ProviderApiError> {
        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url()))
            .header(
                reqwest::header::AUTHORIZATION,
                Self::auth_header(request.credential()),
            )
            .json(&self.submission_body(request.prompt()))
            .send()
            .await?;
        http::parse_json(response).await
    }

    async fn get_prediction(
        &self,
        prediction_id: &str,
        credential: &Credential,
    ) -> Result<Value, ProviderApiError> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{prediction_id}", self.base_url()))
            .header(reqwest::header::AUTHORIZATION, Self::auth_header(credential))
            .send()
            .await?;
        http::parse_json(response).await
    }
}

#[async_trait]
impl ProviderAdapter for ReplicateAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Replicate
    }

    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, TerminalResult> {
        let payload = self
            .create_prediction(request)
            .await
            .map_err(|e| e.into_submit_result(ProviderKind::Replicate.display_name()))?;

        let Some(id) = http::extract_job_id(&payload) else {
            tracing::warn!(provider = "replicate", "No prediction id in response");
            return Err(TerminalResult::provider_error("no job id in response"));
        };

        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!(provider = "replicate", job_id = %id, status, "Prediction created");
        Ok(JobHandle::new(ProviderKind::Replicate, id))
    }

    async fn poll(
        &self,
        handle: &JobHandle,
        credential: &Credential,
    ) -> Result<PollOutcome, TerminalResult> {
        let payload = self
            .get_prediction(handle.provider_job_id(), credential)
            .await
            .map_err(ProviderApiError::into_poll_result)?;
        interpret_status(&payload)
    }
}

// ---------------------------------------------------------------------------
// Payload interpretation
// ---------------------------------------------------------------------------

/// Map a prediction status payload to a poll outcome.
///
/// `succeeded` needs a usable output URL, otherwise the job is reported as
/// a provider error. `failed` and `canceled` are failures. Any other status
/// (`starting`, `processing`, missing) is still pending.
pub fn interpret_status(payload: &Value) -> Result<PollOutcome, TerminalResult> {
    match payload.get("status").and_then(Value::as_str) {
        Some("succeeded") => extract_output_url(payload)
            .map(|video_url| PollOutcome::Succeeded { video_url })
            .ok_or_else(|| TerminalResult::provider_error("no output")),
        Some("failed") | Some("canceled") => Ok(PollOutcome::Failed {
            reason: format!("Prediction failed: {}", error_reason(payload)),
        }),
        _ => Ok(PollOutcome::Pending),
    }
}

/// Output URL of a finished prediction.
///
/// Tries `output` first, which the model returns either as a bare string
/// or as an array of strings (first element wins), then `urls.get`.
pub fn extract_output_url(payload: &Value) -> Option<String> {
    let usable = |url: &&str| !url.trim().is_empty();
    let primary = match payload.get("output") {
        Some(Value::String(url)) => Some(url.as_str()).filter(usable),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).find(usable),
        _ => None,
    };

    primary
        .or_else(|| payload.pointer("/urls/get").and_then(Value::as_str).filter(usable))
        .map(str::to_string)
}

fn error_reason(payload: &Value) -> String {
    match payload.get("error") {
        Some(Value::String(msg)) if !msg.is_empty() => msg.clone(),
        Some(Value::Null) | None => "Unknown error".to_string(),
        Some(other) => other.to_string(),
    }
}
