//! Lookup from [`ProviderKind`] to the adapter that serves it.

use std::collections::HashMap;
use std::sync::Arc;

use vidgen_core::adapter::ProviderAdapter;
use vidgen_core::job::ProviderKind;

use crate::openai::{OpenAiAdapter, OpenAiConfig};
use crate::replicate::{ReplicateAdapter, ReplicateConfig};

/// Adapters keyed by the provider they implement.
///
/// Immutable after startup and shared across requests behind an `Arc`;
/// adapters themselves hold no per-request state.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the production adapters sharing one HTTP client.
    pub fn with_defaults(
        client: reqwest::Client,
        replicate: ReplicateConfig,
        openai: OpenAiConfig,
    ) -> Self {
        Self::new()
            .with(Arc::new(ReplicateAdapter::with_client(client.clone(), replicate)))
            .with(Arc::new(OpenAiAdapter::with_client(client, openai)))
    }

    /// Add (or replace) the adapter for `adapter.kind()`.
    pub fn with(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
