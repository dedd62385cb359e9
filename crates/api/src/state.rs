use std::sync::Arc;

use vidgen_pipeline::JobProxy;
use vidgen_providers::ProviderRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is `Copy`).
/// Nothing in here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, including fallback provider credentials.
    pub config: Arc<ServerConfig>,
    /// Provider adapters keyed by provider kind.
    pub providers: Arc<ProviderRegistry>,
    /// Per-request job orchestration with the configured time budgets.
    pub proxy: JobProxy,
}

impl AppState {
    pub fn new(config: ServerConfig, providers: ProviderRegistry) -> Self {
        let proxy = JobProxy::new(config.proxy);
        Self {
            config: Arc::new(config),
            providers: Arc::new(providers),
            proxy,
        }
    }
}
