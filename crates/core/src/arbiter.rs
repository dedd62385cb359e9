//! Exactly-once delivery of a request's [`TerminalResult`].
//!
//! Several activities race to finish a request: the poller reaching a
//! terminal state, the poller exhausting its attempts, and the request
//! timeout guard firing. Each of them calls [`ResponseArbiter::deliver`];
//! the first call wins and every later one is a silent no-op.
//!
//! The winner also cancels the request's [`CancellationToken`], which
//! stops any pending poll tick and the timeout timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::job::TerminalResult;

/// Request-scoped, one-shot delivery cell.
pub struct ResponseArbiter {
    delivered: AtomicBool,
    slot: Mutex<Option<oneshot::Sender<TerminalResult>>>,
    cancel: CancellationToken,
}

/// Receiving end handed to whoever answers the caller.
pub struct Delivery {
    rx: oneshot::Receiver<TerminalResult>,
}

impl ResponseArbiter {
    /// Create an arbiter for one request.
    ///
    /// `cancel` is cancelled as soon as a result is delivered.
    pub fn new(cancel: CancellationToken) -> (Arc<Self>, Delivery) {
        let (tx, rx) = oneshot::channel();
        let arbiter = Arc::new(Self {
            delivered: AtomicBool::new(false),
            slot: Mutex::new(Some(tx)),
            cancel,
        });
        (arbiter, Delivery { rx })
    }

    /// Offer a terminal result. Returns `true` if this call won.
    pub fn deliver(&self, result: TerminalResult) -> bool {
        // Claim and mark in one step so two racing sources cannot both win.
        if self
            .delivered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(result = result.kind(), "Result discarded, already delivered");
            return false;
        }

        self.cancel.cancel();

        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sender {
            Some(tx) => {
                let kind = result.kind();
                if tx.send(result).is_err() {
                    tracing::debug!(result = kind, "Caller went away before delivery");
                }
            }
            None => tracing::warn!("Delivery slot empty after winning the claim"),
        }
        true
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered.load(Ordering::Acquire)
    }

    /// Token cancelled once a result has been delivered.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Delivery {
    /// Wait for the winning result.
    ///
    /// Returns `None` only if every arbiter handle was dropped without a
    /// delivery.
    pub async fn recv(self) -> Option<TerminalResult> {
        self.rx.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::job::TimeoutSource;

    fn ready(url: &str) -> TerminalResult {
        TerminalResult::VideoReady { url: url.to_string() }
    }

    fn deadline() -> TerminalResult {
        TerminalResult::Timeout(TimeoutSource::RequestDeadline {
            budget: Duration::from_secs(300),
        })
    }

    #[tokio::test]
    async fn first_delivery_wins() {
        let (arbiter, delivery) = ResponseArbiter::new(CancellationToken::new());

        assert!(arbiter.deliver(ready("https://cdn/x.mp4")));
        assert!(!arbiter.deliver(deadline()));

        assert_eq!(delivery.recv().await, Some(ready("https://cdn/x.mp4")));
    }

    #[tokio::test]
    async fn delivery_cancels_token() {
        let cancel = CancellationToken::new();
        let (arbiter, _delivery) = ResponseArbiter::new(cancel.clone());

        assert!(!cancel.is_cancelled());
        arbiter.deliver(deadline());
        assert!(cancel.is_cancelled());
        assert!(arbiter.is_delivered());
    }

    #[tokio::test]
    async fn deliver_after_caller_dropped_is_harmless() {
        let (arbiter, delivery) = ResponseArbiter::new(CancellationToken::new());
        drop(delivery);

        assert!(arbiter.deliver(ready("u")));
        assert!(!arbiter.deliver(ready("v")));
    }

    #[tokio::test]
    async fn recv_is_none_when_arbiter_dropped_undelivered() {
        let (arbiter, delivery) = ResponseArbiter::new(CancellationToken::new());
        drop(arbiter);
        assert_eq!(delivery.recv().await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deliveries_have_exactly_one_winner() {
        for round in 0..200 {
            let (arbiter, delivery) = ResponseArbiter::new(CancellationToken::new());

            let contenders = (0..8).map(|i| {
                let arbiter = Arc::clone(&arbiter);
                tokio::spawn(async move {
                    let result = if i % 2 == 0 {
                        ready(&format!("https://cdn/{round}/{i}.mp4"))
                    } else {
                        deadline()
                    };
                    (arbiter.deliver(result.clone()), result)
                })
            });

            let outcomes: Vec<_> = futures::future::join_all(contenders)
                .await
                .into_iter()
                .map(|r| r.expect("task panicked"))
                .collect();

            let winners: Vec<_> = outcomes.iter().filter(|(won, _)| *won).collect();
            assert_eq!(winners.len(), 1, "round {round}: exactly one winner");

            let observed = delivery.recv().await.expect("a result was delivered");
            assert_eq!(observed, winners[0].1, "round {round}: winner's value observed");
        }
    }
}
