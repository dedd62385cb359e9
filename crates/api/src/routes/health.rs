use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    providers: Vec<&'static str>,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let providers = vidgen_core::job::ProviderKind::ALL
        .into_iter()
        .filter(|kind| state.providers.get(*kind).is_some())
        .map(|kind| kind.as_str())
        .collect();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        providers,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
