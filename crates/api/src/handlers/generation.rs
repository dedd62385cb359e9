//! Handler for synchronous video generation.
//!
//! Routes:
//! - `POST /api/generate-video` -- generate a video and wait for the result

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vidgen_core::job::{JobRequest, ProviderKind};

use crate::error::{AppError, AppResult};
use crate::response::GenerationResponse;
use crate::state::AppState;

/// Body of `POST /api/generate-video`.
#[derive(Debug, Deserialize)]
pub struct GenerateVideoRequest {
    #[serde(default)]
    pub prompt: String,
    /// `"replicate"` or `"openai"`; OpenAI when omitted.
    #[serde(default)]
    pub provider: Option<String>,
    /// Caller-supplied provider key. Falls back to the server's key.
    #[serde(default, alias = "apiKey")]
    pub credential: Option<String>,
}

/// POST /api/generate-video
///
/// Validates the request, submits it to the selected provider and holds
/// the connection open until the job succeeds, fails or times out.
pub async fn generate_video(
    State(state): State<AppState>,
    payload: Result<Json<GenerateVideoRequest>, JsonRejection>,
) -> AppResult<GenerationResponse> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let provider = match input.provider.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.parse::<ProviderKind>()?,
        _ => ProviderKind::default(),
    };

    tracing::info!(
        provider = %provider,
        prompt_len = input.prompt.len(),
        caller_key = input.credential.as_deref().is_some_and(|c| !c.trim().is_empty()),
        "Received video generation request",
    );

    let credential = state
        .config
        .resolve_credential(provider, input.credential.as_deref());
    let request = JobRequest::new(input.prompt, provider, credential)?;

    let adapter = state.providers.get(provider).ok_or_else(|| {
        AppError::InternalError(format!("No adapter registered for provider {provider}"))
    })?;

    let result = state.proxy.run(adapter, request).await;
    Ok(GenerationResponse(result))
}
