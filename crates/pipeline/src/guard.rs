//! Request-wide deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use vidgen_core::arbiter::ResponseArbiter;
use vidgen_core::job::{TerminalResult, TimeoutSource};

/// Timer bounding a request's total lifetime, independent of the poller.
///
/// If the budget elapses before anything else has answered the caller, the
/// guard delivers a [`TimeoutSource::RequestDeadline`] timeout. The timer
/// task exits as soon as the arbiter's token is cancelled and is aborted
/// when the guard is dropped, so it never outlives its request.
pub struct TimeoutGuard {
    task: JoinHandle<()>,
}

impl TimeoutGuard {
    /// Start the timer now.
    pub fn start(arbiter: Arc<ResponseArbiter>, budget: Duration) -> Self {
        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = arbiter.cancellation().cancelled() => {}
                _ = tokio::time::sleep(budget) => {
                    let timeout = TerminalResult::Timeout(TimeoutSource::RequestDeadline { budget });
                    if arbiter.deliver(timeout) {
                        tracing::warn!(budget_secs = budget.as_secs(), "Request deadline reached");
                    }
                }
            }
        });
        Self { task }
    }

    /// Stop the timer. Safe to call after it has fired.
    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimeoutGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
