pub mod generation;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /generate-video          POST  generate a video (blocks until done)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(generation::router())
}
