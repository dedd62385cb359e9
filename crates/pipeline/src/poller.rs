//! Bounded status polling for a submitted job.
//!
//! ```text
//! Polling{attempts} --attempts >= max--------> Done (Timeout: PollExhausted)
//! Polling{attempts} --sleep, poll: Pending----> Polling{attempts + 1}
//! Polling{attempts} --sleep, poll: Succeeded--> Done (VideoReady)
//! Polling{attempts} --sleep, poll: Failed-----> Done (ProviderError 500)
//! Polling{attempts} --sleep, poll: Err(r)-----> Done (r)
//! Polling{attempts} --cancelled---------------> Done (nothing delivered)
//! ```
//!
//! A failed status call ends the request. It is not retried on the next
//! tick.

use std::sync::Arc;
use std::time::Duration;

use vidgen_core::adapter::ProviderAdapter;
use vidgen_core::arbiter::ResponseArbiter;
use vidgen_core::job::{Credential, JobHandle, PollOutcome, TerminalResult, TimeoutSource};

/// Polls one job until it reaches a terminal state.
pub struct Poller {
    adapter: Arc<dyn ProviderAdapter>,
    handle: JobHandle,
    credential: Credential,
    interval: Duration,
    max_attempts: u32,
}

enum PollState {
    Polling { attempts: u32 },
    Done { attempts: u32 },
}

impl Poller {
    pub fn new(
        adapter: Arc<dyn ProviderAdapter>,
        handle: JobHandle,
        credential: Credential,
        interval: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            adapter,
            handle,
            credential,
            interval,
            max_attempts,
        }
    }

    /// Run the loop, delivering the terminal result through `arbiter`.
    ///
    /// Stops without delivering as soon as the arbiter's cancellation token
    /// fires. Returns the number of status calls made.
    pub async fn run(self, arbiter: &ResponseArbiter) -> u32 {
        let mut state = PollState::Polling { attempts: 0 };

        loop {
            state = match state {
                PollState::Polling { attempts } => self.tick(attempts, arbiter).await,
                PollState::Done { attempts } => return attempts,
            };
        }
    }

    async fn tick(&self, attempts: u32, arbiter: &ResponseArbiter) -> PollState {
        let job_id = self.handle.provider_job_id();

        if attempts >= self.max_attempts {
            tracing::warn!(job_id, attempts, "Polling attempts exhausted");
            arbiter.deliver(TerminalResult::Timeout(TimeoutSource::PollExhausted {
                attempts,
            }));
            return PollState::Done { attempts };
        }

        tokio::select! {
            biased;
            _ = arbiter.cancellation().cancelled() => {
                tracing::debug!(job_id, attempts, "Polling stopped, request already answered");
                return PollState::Done { attempts };
            }
            _ = tokio::time::sleep(self.interval) => {}
        }

        let attempt = attempts + 1;
        tracing::debug!(
            job_id,
            attempt,
            max_attempts = self.max_attempts,
            "Checking job status",
        );

        match self.adapter.poll(&self.handle, &self.credential).await {
            Ok(PollOutcome::Pending) => PollState::Polling { attempts: attempt },
            Ok(PollOutcome::Succeeded { video_url }) => {
                tracing::info!(job_id, attempt, video_url = %video_url, "Video generated");
                arbiter.deliver(TerminalResult::VideoReady { url: video_url });
                PollState::Done { attempts: attempt }
            }
            Ok(PollOutcome::Failed { reason }) => {
                tracing::warn!(job_id, attempt, reason = %reason, "Job failed");
                arbiter.deliver(TerminalResult::provider_error(reason));
                PollState::Done { attempts: attempt }
            }
            Err(result) => {
                tracing::warn!(job_id, attempt, result = result.kind(), "Status check failed");
                arbiter.deliver(result);
                PollState::Done { attempts: attempt }
            }
        }
    }
}
