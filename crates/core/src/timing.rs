//! Time budgets for one proxied request.

use std::time::Duration;

use crate::error::CoreError;

/// Delay between consecutive status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Status checks allowed before the poller gives up on its own.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;
/// Total lifetime of a request, enforced independently of the poller.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Polling cadence plus the request-wide deadline.
///
/// The two budgets are independent. With the defaults they
/// are roughly equal (30 x 10s vs 300s) and either may expire first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxySettings {
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub request_timeout: Duration,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ProxySettings {
    /// Reject settings under which a submitted job could never be polled.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_poll_attempts == 0 {
            return Err(CoreError::Validation(
                "max_poll_attempts must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(CoreError::Validation(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
