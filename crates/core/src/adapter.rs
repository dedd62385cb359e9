//! The seam between provider-agnostic job handling and a concrete backend.
//!
//! Submitter and poller only ever talk to a [`ProviderAdapter`]; adding a
//! backend means writing one more implementation, not branching call sites.

use async_trait::async_trait;

use crate::job::{Credential, JobHandle, JobRequest, PollOutcome, ProviderKind, TerminalResult};

/// Translation layer between canonical job operations and one backend's
/// wire format.
///
/// Implementations never fail past this contract: transport errors,
/// non-2xx responses and unrecognisable payloads all come back as a
/// [`TerminalResult`] in the `Err` position.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// The provider this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Create a job. A non-2xx response yields a `ProviderError` carrying the
    /// upstream status and body; a 2xx response without a job id yields a
    /// `ProviderError` with reason "no job id in response".
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, TerminalResult>;

    /// Check a job's status once. Never retries.
    async fn poll(
        &self,
        handle: &JobHandle,
        credential: &Credential,
    ) -> Result<PollOutcome, TerminalResult>;
}
