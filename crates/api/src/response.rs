//! Mapping of a request's [`TerminalResult`] onto the HTTP response the
//! caller receives.
//!
//! | Result          | Status                      | Body                                   |
//! |-----------------|-----------------------------|----------------------------------------|
//! | `VideoReady`    | 200                         | `{ "videoUrl": ..., "status": "completed" }` |
//! | `ProviderError` | carried status (default 500) | `{ "error": ..., "code": "PROVIDER_ERROR" }` |
//! | `Timeout`       | 408                         | `{ "error": ..., "code": "TIMEOUT" }`  |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use vidgen_core::job::TerminalResult;

/// Successful generation payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoReadyResponse {
    pub video_url: String,
    pub status: &'static str,
}

/// Wrapper giving a [`TerminalResult`] an HTTP representation.
#[derive(Debug)]
pub struct GenerationResponse(pub TerminalResult);

impl IntoResponse for GenerationResponse {
    fn into_response(self) -> Response {
        match self.0 {
            TerminalResult::VideoReady { url } => Json(VideoReadyResponse {
                video_url: url,
                status: "completed",
            })
            .into_response(),
            TerminalResult::ProviderError { message, status } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let body = json!({ "error": message, "code": "PROVIDER_ERROR" });
                (status, Json(body)).into_response()
            }
            TerminalResult::Timeout(source) => {
                let body = json!({ "error": source.to_string(), "code": "TIMEOUT" });
                (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
            }
        }
    }
}
