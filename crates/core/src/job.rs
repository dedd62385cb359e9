//! Per-request job types: what the caller asked for, what the backend
//! handed back, and how a request ends.
//!
//! All of these are created fresh for one incoming request and dropped
//! once the caller has its response. Nothing here is shared across
//! requests.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Provider selection
// ---------------------------------------------------------------------------

/// The external generation backend a job is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "replicate")]
    Replicate,
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Every supported provider, in registration order.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Replicate, ProviderKind::OpenAi];

    /// Wire name used in request bodies (`"replicate"`, `"openai"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Replicate => "replicate",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Human-readable name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Replicate => "Replicate",
            ProviderKind::OpenAi => "OpenAI",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown provider '{s}'. Must be one of: replicate, openai"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An opaque provider API secret.
///
/// `Debug` never prints the secret so a credential can sit inside
/// structs that are logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

// ---------------------------------------------------------------------------
// JobRequest
// ---------------------------------------------------------------------------

/// A validated request to generate one video.
///
/// Construction through [`JobRequest::new`] guarantees a non-blank prompt
/// and a non-blank credential, so adapters never make a network call for
/// a request that could not possibly succeed.
#[derive(Debug, Clone)]
pub struct JobRequest {
    prompt: String,
    provider: ProviderKind,
    credential: Credential,
}

impl JobRequest {
    pub fn new(
        prompt: impl Into<String>,
        provider: ProviderKind,
        credential: Credential,
    ) -> Result<Self, CoreError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(CoreError::Validation("Prompt is required".to_string()));
        }
        if credential.is_empty() {
            return Err(CoreError::Validation(format!(
                "{} API key not configured",
                provider.display_name()
            )));
        }
        Ok(Self {
            prompt,
            provider,
            credential,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

// ---------------------------------------------------------------------------
// JobHandle
// ---------------------------------------------------------------------------

/// Identifies a job accepted by a provider. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    provider_job_id: String,
    provider: ProviderKind,
}

impl JobHandle {
    pub fn new(provider: ProviderKind, provider_job_id: impl Into<String>) -> Self {
        Self {
            provider_job_id: provider_job_id.into(),
            provider,
        }
    }

    pub fn provider_job_id(&self) -> &str {
        &self.provider_job_id
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }
}

// ---------------------------------------------------------------------------
// PollOutcome
// ---------------------------------------------------------------------------

/// Classification of a single successful status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job is still queued or running.
    Pending,
    /// The job finished and produced a video.
    Succeeded { video_url: String },
    /// The provider reports the job as failed.
    Failed { reason: String },
}

// ---------------------------------------------------------------------------
// TerminalResult
// ---------------------------------------------------------------------------

/// Which clock ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutSource {
    /// The poller used up its attempt budget with the job still pending.
    PollExhausted { attempts: u32 },
    /// The request-wide deadline fired first.
    RequestDeadline { budget: Duration },
}

impl fmt::Display for TimeoutSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutSource::PollExhausted { attempts } => {
                write!(f, "Prediction timed out after {attempts} polling attempts")
            }
            TimeoutSource::RequestDeadline { .. } => {
                f.write_str("Request timeout - video generation took too long")
            }
        }
    }
}

/// HTTP status carried by a [`TerminalResult::Timeout`].
pub const TIMEOUT_STATUS: u16 = 408;

/// Default HTTP status for provider errors raised after submission.
pub const PROVIDER_ERROR_STATUS: u16 = 500;

/// The single outcome delivered to the caller for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalResult {
    VideoReady { url: String },
    ProviderError { message: String, status: u16 },
    Timeout(TimeoutSource),
}

impl TerminalResult {
    /// Provider error with the default post-submission status (500).
    pub fn provider_error(message: impl Into<String>) -> Self {
        TerminalResult::ProviderError {
            message: message.into(),
            status: PROVIDER_ERROR_STATUS,
        }
    }

    /// Provider error carrying an explicit (usually upstream) status.
    pub fn provider_error_with_status(message: impl Into<String>, status: u16) -> Self {
        TerminalResult::ProviderError {
            message: message.into(),
            status,
        }
    }

    /// HTTP status the caller-facing layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            TerminalResult::VideoReady { .. } => 200,
            TerminalResult::ProviderError { status, .. } => *status,
            TerminalResult::Timeout(_) => TIMEOUT_STATUS,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TerminalResult::VideoReady { .. })
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TerminalResult::VideoReady { .. } => "video_ready",
            TerminalResult::ProviderError { .. } => "provider_error",
            TerminalResult::Timeout(TimeoutSource::PollExhausted { .. }) => "poll_exhausted",
            TerminalResult::Timeout(TimeoutSource::RequestDeadline { .. }) => "request_deadline",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
