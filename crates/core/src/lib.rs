//! Canonical domain types for the asynchronous video job proxy.
//!
//! Everything provider-agnostic lives here: the job request and its
//! validation, the terminal result every request ends with, the
//! [`adapter::ProviderAdapter`] seam that backends implement, and the
//! [`arbiter::ResponseArbiter`] that enforces exactly-once delivery.

pub mod adapter;
pub mod arbiter;
pub mod error;
pub mod job;
pub mod timing;
