//! Per-request orchestration.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use vidgen_core::adapter::ProviderAdapter;
use vidgen_core::arbiter::ResponseArbiter;
use vidgen_core::job::{JobRequest, TerminalResult};
use vidgen_core::timing::ProxySettings;

use crate::guard::TimeoutGuard;
use crate::poller::Poller;
use crate::submitter::submit_job;

/// Turns one synchronous caller request into a provider job and waits for
/// its single terminal result.
///
/// Holds only immutable settings; every call to [`JobProxy::run`] gets its
/// own arbiter, timer and poller, so concurrent requests share nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobProxy {
    settings: ProxySettings,
}

impl JobProxy {
    pub fn new(settings: ProxySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    /// Submit `request` through `adapter`, poll until done, and return the
    /// one result that won the race against the request deadline.
    ///
    /// Dropping the returned future (e.g. the caller disconnected) stops the
    /// poller and the deadline timer. Provider calls already in flight are
    /// left to finish and their results are discarded.
    pub async fn run(
        &self,
        adapter: Arc<dyn ProviderAdapter>,
        request: JobRequest,
    ) -> TerminalResult {
        let cancel = CancellationToken::new();
        let _stop_on_drop = cancel.clone().drop_guard();

        let (arbiter, delivery) = ResponseArbiter::new(cancel);
        let guard = TimeoutGuard::start(Arc::clone(&arbiter), self.settings.request_timeout);

        tokio::spawn(drive_job(adapter, request, arbiter, self.settings));

        let result = delivery.recv().await;
        guard.cancel();

        let result = result.unwrap_or_else(|| {
            tracing::error!("Job ended without delivering a result");
            TerminalResult::provider_error("Job ended without a result")
        });
        tracing::info!(
            result = result.kind(),
            status = result.status_code(),
            "Request finished"
        );
        result
    }
}

async fn drive_job(
    adapter: Arc<dyn ProviderAdapter>,
    request: JobRequest,
    arbiter: Arc<ResponseArbiter>,
    settings: ProxySettings,
) {
    let Some(handle) = submit_job(adapter.as_ref(), &request, &arbiter).await else {
        return;
    };

    tracing::info!(
        provider = %handle.provider(),
        job_id = handle.provider_job_id(),
        "Job accepted, polling for completion",
    );

    let attempts = Poller::new(
        adapter,
        handle,
        request.credential().clone(),
        settings.poll_interval,
        settings.max_poll_attempts,
    )
    .run(&arbiter)
    .await;

    tracing::debug!(attempts, "Poller finished");
}
