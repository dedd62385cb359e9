//! Job submission.

use vidgen_core::adapter::ProviderAdapter;
use vidgen_core::arbiter::ResponseArbiter;
use vidgen_core::job::{JobHandle, JobRequest};

/// Create the job through `adapter`.
///
/// Returns the handle to poll on success. On an immediate failure the
/// adapter's result is offered to the arbiter and `None` is returned, so no
/// polling starts.
pub async fn submit_job(
    adapter: &dyn ProviderAdapter,
    request: &JobRequest,
    arbiter: &ResponseArbiter,
) -> Option<JobHandle> {
    tracing::info!(provider = %request.provider(), "Submitting generation job");

    match adapter.submit(request).await {
        Ok(handle) => Some(handle),
        Err(result) => {
            tracing::warn!(
                provider = %request.provider(),
                status = result.status_code(),
                "Job submission failed",
            );
            arbiter.deliver(result);
            None
        }
    }
}
