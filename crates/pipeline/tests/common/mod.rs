use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use vidgen_core::adapter::ProviderAdapter;
use vidgen_core::job::{
    Credential, JobHandle, JobRequest, PollOutcome, ProviderKind, TerminalResult,
};

/// In-memory adapter that replays scripted responses.
///
/// Poll responses are consumed in order; once the script runs out every
/// further poll reports `Pending`. Delays use `tokio::time`, so tests run
/// under a paused clock.
pub struct ScriptedAdapter {
    submit: Result<JobHandle, TerminalResult>,
    submit_delay: Duration,
    polls: Mutex<VecDeque<Result<PollOutcome, TerminalResult>>>,
    poll_delay: Duration,
    submit_calls: AtomicU32,
    poll_calls: AtomicU32,
}

impl ScriptedAdapter {
    /// Accepts every submission with job id `job_id`.
    pub fn accepting(job_id: &str) -> Self {
        Self::with_submit(Ok(JobHandle::new(ProviderKind::Replicate, job_id)))
    }

    /// Rejects every submission with `result`.
    pub fn rejecting(result: TerminalResult) -> Self {
        Self::with_submit(Err(result))
    }

    fn with_submit(submit: Result<JobHandle, TerminalResult>) -> Self {
        Self {
            submit,
            submit_delay: Duration::ZERO,
            polls: Mutex::new(VecDeque::new()),
            poll_delay: Duration::ZERO,
            submit_calls: AtomicU32::new(0),
            poll_calls: AtomicU32::new(0),
        }
    }

    pub fn polls(self, script: Vec<Result<PollOutcome, TerminalResult>>) -> Self {
        *self.polls.lock().unwrap() = script.into();
        self
    }

    pub fn submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> u32 {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Replicate
    }

    async fn submit(&self, _request: &JobRequest) -> Result<JobHandle, TerminalResult> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        self.submit.clone()
    }

    async fn poll(
        &self,
        _handle: &JobHandle,
        _credential: &Credential,
    ) -> Result<PollOutcome, TerminalResult> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        if !self.poll_delay.is_zero() {
            tokio::time::sleep(self.poll_delay).await;
        }
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(PollOutcome::Pending))
    }
}

pub fn request(prompt: &str) -> JobRequest {
    JobRequest::new(prompt, ProviderKind::Replicate, Credential::new("r8_test")).unwrap()
}

pub fn pending() -> Result<PollOutcome, TerminalResult> {
    Ok(PollOutcome::Pending)
}

pub fn succeeded(url: &str) -> Result<PollOutcome, TerminalResult> {
    Ok(PollOutcome::Succeeded {
        video_url: url.to_string(),
    })
}
