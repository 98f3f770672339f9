//! # Completion gate.
//!
//! Lets external callers wait, with a bound, for the controller's exit marker:
//! the signal fired when [`ServiceController::start`](crate::ServiceController::start)
//! returns, whichever path it took.
//!
//! A process that is not running under a service manager has nothing to wait for,
//! so the gate checks [`Platform::is_service`] first and returns immediately.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::{control::Signal, platform::Platform};

/// Outcome of waiting on the completion gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Not running under a service manager; nothing was awaited.
    Unsupervised,
    /// The controller finished and reported its terminal state.
    Terminated,
    /// The bound elapsed before the controller finished.
    TimedOut,
}

/// Bounded wait on the controller's exit marker.
#[derive(Clone)]
pub struct CompletionGate {
    exited: Signal,
    platform: Arc<dyn Platform>,
}

impl CompletionGate {
    pub(crate) fn new(exited: Signal, platform: Arc<dyn Platform>) -> Self {
        Self { exited, platform }
    }

    /// Returns `true` if the process runs under a service manager.
    ///
    /// A failing query counts as "not supervised".
    pub fn is_supervised(&self) -> bool {
        match self.platform.is_service() {
            Ok(supervised) => supervised,
            Err(e) => {
                tracing::debug!(error = %e, "service query failed; assuming not supervised");
                false
            }
        }
    }

    /// Returns `true` once the controller has finished.
    pub fn is_terminated(&self) -> bool {
        self.exited.is_fired()
    }

    /// Waits up to `max_wait` for the controller to finish.
    pub async fn wait(&self, max_wait: Duration) -> Termination {
        if !self.is_supervised() {
            return Termination::Unsupervised;
        }
        match time::timeout(max_wait, self.exited.fired()).await {
            Ok(()) => Termination::Terminated,
            Err(_elapsed) => Termination::TimedOut,
        }
    }
}
