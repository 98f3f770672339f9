//! # Single-fire broadcast signal.
//!
//! [`Signal`] is "close once" rather than "send a value": firing is sticky, every
//! current and future waiter observes it, and firing again is a no-op.
//! It is backed by a [`CancellationToken`].
//!
//! The controller uses three independent signals:
//! - **stop**: fired by whoever decides to stop (host application or service manager path);
//! - **completion**: fired by the host once its own teardown has finished;
//! - **exit**: fired when `ServiceController::start` returns, observed by the completion gate.

use tokio_util::sync::{CancellationToken, DropGuard};

/// Fire-once, broadcast-to-all signal. Clones share the same signal.
#[derive(Clone, Debug, Default)]
pub struct Signal {
    token: CancellationToken,
}

impl Signal {
    /// Creates an unfired signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal. Subsequent calls have no effect.
    pub fn fire(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the signal has been fired.
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the signal is fired (immediately if it already was).
    pub async fn fired(&self) {
        self.token.cancelled().await;
    }

    /// Returns a guard that fires the signal when dropped.
    pub fn guard(&self) -> SignalGuard {
        SignalGuard {
            _inner: self.token.clone().drop_guard(),
        }
    }
}

/// Fires its [`Signal`] on drop, whichever path the owner leaves by.
#[must_use = "the signal fires as soon as the guard is dropped"]
pub struct SignalGuard {
    _inner: DropGuard,
}
