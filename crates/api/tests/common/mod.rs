#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use vidgen_api::config::ServerConfig;
use vidgen_api::router::build_app_router;
use vidgen_api::state::AppState;
use vidgen_core::adapter::ProviderAdapter;
use vidgen_core::job::{
    Credential, JobHandle, JobRequest, PollOutcome, ProviderKind, TerminalResult,
};
use vidgen_core::timing::ProxySettings;
use vidgen_providers::ProviderRegistry;

/// Build a test `ServerConfig` with defaults and no server-side keys.
pub fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|_| None)
}

/// Same as [`test_config`] with the given polling budgets.
pub fn test_config_with(interval_secs: u64, max_attempts: u32, timeout_secs: u64) -> ServerConfig {
    let mut config = test_config();
    config.proxy = ProxySettings {
        poll_interval: Duration::from_secs(interval_secs),
        max_poll_attempts: max_attempts,
        request_timeout: Duration::from_secs(timeout_secs),
    };
    config
}

/// Build the full application router (same middleware stack as production)
/// over the given adapters.
pub fn build_test_app(config: ServerConfig, adapters: Vec<Arc<dyn ProviderAdapter>>) -> Router {
    let registry = adapters
        .into_iter()
        .fold(ProviderRegistry::new(), |registry, adapter| registry.with(adapter));
    let state = AppState::new(config.clone(), registry);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// RecordingAdapter
// ---------------------------------------------------------------------------

/// In-memory adapter that replays a poll script and records what it saw.
pub struct RecordingAdapter {
    kind: ProviderKind,
    submit: Result<String, TerminalResult>,
    polls: Mutex<VecDeque<Result<PollOutcome, TerminalResult>>>,
    credentials: Mutex<Vec<String>>,
    submit_calls: AtomicU32,
    poll_calls: AtomicU32,
}

impl RecordingAdapter {
    pub fn accepting(kind: ProviderKind, job_id: &str) -> Self {
        Self::new(kind, Ok(job_id.to_string()))
    }

    pub fn rejecting(kind: ProviderKind, result: TerminalResult) -> Self {
        Self::new(kind, Err(result))
    }

    fn new(kind: ProviderKind, submit: Result<String, TerminalResult>) -> Self {
        Self {
            kind,
            submit,
            polls: Mutex::new(VecDeque::new()),
            credentials: Mutex::new(Vec::new()),
            submit_calls: AtomicU32::new(0),
            poll_calls: AtomicU32::new(0),
        }
    }

    pub fn polls(self, script: Vec<Result<PollOutcome, TerminalResult>>) -> Self {
        *self.polls.lock().unwrap() = script.into();
        self
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> u32 {
        self.poll_calls.load(Ordering::SeqCst)
    }

    /// Credentials seen by submit and poll, in call order.
    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderAdapter for RecordingAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, TerminalResult> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .unwrap()
            .push(request.credential().expose().to_string());
        self.submit
            .clone()
            .map(|id| JobHandle::new(self.kind, id))
    }

    async fn poll(
        &self,
        _handle: &JobHandle,
        credential: &Credential,
    ) -> Result<PollOutcome, TerminalResult> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(PollOutcome::Pending))
    }
}
