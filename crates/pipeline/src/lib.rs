//! Drives one proxied request from submission to its single terminal
//! result.
//!
//! [`proxy::JobProxy`] wires the pieces together per request: the
//! [`submitter`] creates the job, the [`poller`] checks on it at a fixed
//! interval, and the [`guard::TimeoutGuard`] bounds the request's total
//! lifetime. All of them report through one
//! [`vidgen_core::arbiter::ResponseArbiter`].

pub mod guard;
pub mod poller;
pub mod proxy;
pub mod submitter;

pub use proxy::JobProxy;
