//! Provider adapters for the external video generation backends.
//!
//! Each adapter implements [`vidgen_core::adapter::ProviderAdapter`] over
//! [`reqwest`]: it builds the provider's submission and status requests
//! and folds whatever comes back into canonical types. Payload
//! interpretation is kept in pure functions so it can be tested without a
//! network.

pub mod http;
pub mod openai;
pub mod registry;
pub mod replicate;

pub use openai::{OpenAiAdapter, OpenAiConfig};
pub use registry::ProviderRegistry;
pub use replicate::{ReplicateAdapter, ReplicateConfig};
