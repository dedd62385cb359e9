//! HTTP plumbing shared by every adapter.
//!
//! Adapters make their calls through these helpers so that status
//! checking and error conversion behave identically across providers.

use std::time::Duration;

use vidgen_core::job::TerminalResult;

/// Default timeout for a single upstream HTTP call.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from a single upstream HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum ProviderApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl ProviderApiError {
    /// Convert a failed job-creation call.
    ///
    /// Upstream rejections keep their status so the caller sees e.g. a 401
    /// for a bad key; transport failures become a plain 500.
    pub fn into_submit_result(self, provider: &str) -> TerminalResult {
        match self {
            ProviderApiError::ApiError { status, body } => TerminalResult::provider_error_with_status(
                format!("{provider} API request failed: {status}. Details: {body}"),
                status,
            ),
            ProviderApiError::Request(e) => {
                TerminalResult::provider_error(format!("{provider} API request failed: {e}"))
            }
        }
    }

    /// Convert a failed status check. Always a 500 for the caller.
    pub fn into_poll_result(self) -> TerminalResult {
        match self {
            ProviderApiError::ApiError { status, .. } => {
                TerminalResult::provider_error(format!("Failed to check prediction status: {status}"))
            }
            ProviderApiError::Request(e) => {
                TerminalResult::provider_error(format!("Failed to check prediction status: {e}"))
            }
        }
    }
}

/// Build the shared HTTP client used by all adapters.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`ProviderApiError::ApiError`] containing the
/// status and body text on failure.
pub async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderApiError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body.
pub async fn parse_json(response: reqwest::Response) -> Result<serde_json::Value, ProviderApiError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<serde_json::Value>().await?)
}

/// Read a non-empty string job id from a submission payload.
pub fn extract_job_id(payload: &serde_json::Value) -> Option<&str> {
    payload
        .get("id")
        .and_then(serde_json::Value::as_str)
        .filter(|id| !id.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn job_id_present() {
        assert_eq!(extract_job_id(&json!({ "id": "abc123" })), Some("abc123"));
    }

    #[test]
    fn job_id_missing_blank_or_wrong_type() {
        assert_eq!(extract_job_id(&json!({ "status": "starting" })), None);
        assert_eq!(extract_job_id(&json!({ "id": "" })), None);
        assert_eq!(extract_job_id(&json!({ "id": 42 })), None);
    }

    #[test]
    fn submit_rejection_keeps_upstream_status_and_body() {
        let err = ProviderApiError::ApiError {
            status: 401,
            body: "{\"detail\":\"Unauthenticated\"}".into(),
        };
        assert_matches!(
            err.into_submit_result("Replicate"),
            TerminalResult::ProviderError { status: 401, message }
                if message.contains("Unauthenticated")
        );
    }

    #[test]
    fn poll_rejection_is_500() {
        let err = ProviderApiError::ApiError {
            status: 503,
            body: "unavailable".into(),
        };
        assert_matches!(
            err.into_poll_result(),
            TerminalResult::ProviderError { status: 500, message }
                if message == "Failed to check prediction status: 503"
        );
    }

    #[test]
    fn api_error_display() {
        let err = ProviderApiError::ApiError {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "Provider API error (502): bad gateway");
    }
}
