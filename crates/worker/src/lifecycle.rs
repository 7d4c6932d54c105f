//! Bootstrap lifecycle gate.
//!
//! The host signals `install` and `activate` once each; request handling
//! must not start before activation completes. The gate is a watch
//! channel, so any number of in-flight requests can await readiness
//! without coordination.

use tokio::sync::watch;

/// Bootstrap phase, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Installing,
    Installed,
    Ready,
}

/// One-shot readiness gate over a watch channel.
pub struct Lifecycle {
    tx: watch::Sender<Phase>,
    rx: watch::Receiver<Phase>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(Phase::Installing);
        Self { tx, rx }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        *self.rx.borrow()
    }

    /// Mark installation complete. Idempotent; never moves backwards.
    pub fn install(&self) {
        self.advance(Phase::Installed);
    }

    /// Mark activation complete; unblocks every `ready()` waiter.
    pub fn activate(&self) {
        self.advance(Phase::Ready);
    }

    fn advance(&self, to: Phase) {
        self.tx.send_if_modified(|phase| {
            if *phase < to {
                tracing::debug!("lifecycle advanced {:?} -> {:?}", phase, to);
                *phase = to;
                true
            } else {
                false
            }
        });
    }

    /// Suspend until activation has completed. Returns immediately once
    /// ready, including for calls that arrive long after activation.
    pub async fn ready(&self) {
        let mut rx = self.rx.clone();
        // wait_for also checks the current value before suspending
        let _ = rx.wait_for(|phase| *phase == Phase::Ready).await;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_phases_advance_monotonically() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(), Phase::Installing);

        lifecycle.install();
        assert_eq!(lifecycle.phase(), Phase::Installed);

        lifecycle.activate();
        assert_eq!(lifecycle.phase(), Phase::Ready);

        // repeated or out-of-order calls change nothing
        lifecycle.install();
        assert_eq!(lifecycle.phase(), Phase::Ready);
    }

    #[test]
    fn test_activate_without_install_still_reaches_ready() {
        let lifecycle = Lifecycle::new();
        lifecycle.activate();
        assert_eq!(lifecycle.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_ready_blocks_until_activation() {
        let lifecycle = Arc::new(Lifecycle::new());

        let waiter = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move {
                lifecycle.ready().await;
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        lifecycle.install();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        lifecycle.activate();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_ready_returns_immediately_after_activation() {
        let lifecycle = Lifecycle::new();
        lifecycle.activate();
        lifecycle.ready().await;
        lifecycle.ready().await;
    }
}
