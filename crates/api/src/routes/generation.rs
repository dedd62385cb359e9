use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Routes merged into the `/api` nest.
///
/// ```text
/// POST /generate-video
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate-video", post(generation::generate_video))
}
