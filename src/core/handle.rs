//! # Host-facing handle.
//!
//! [`ServiceHandle`] is the cheap, cloneable side of the controller that the host
//! application keeps while [`ServiceController::start`](crate::ServiceController::start)
//! runs elsewhere.
//!
//! ```text
//! host                         controller
//!  ├─ request_stop()        ──► stop signal        ──► mux synthesizes Shutdown
//!  ├─ notify_shutdown_complete() ──► completion signal ──► session reports Stopped
//!  └─ wait_for_termination() ◄── exit marker (bounded, skipped when unsupervised)
//! ```

use std::time::Duration;

use crate::{
    control::Signal,
    core::gate::{CompletionGate, Termination},
};

/// Cloneable handle for stopping the controller and observing its termination.
#[derive(Clone)]
pub struct ServiceHandle {
    stop: Signal,
    completion: Signal,
    gate: CompletionGate,
    termination_wait: Duration,
}

impl ServiceHandle {
    pub(crate) fn new(
        stop: Signal,
        completion: Signal,
        gate: CompletionGate,
        termination_wait: Duration,
    ) -> Self {
        Self {
            stop,
            completion,
            gate,
            termination_wait,
        }
    }

    /// Asks the controller to stop, as if the service manager had sent `Stop`.
    ///
    /// Callable from any task. Only the first call has an effect.
    pub fn request_stop(&self) {
        self.stop.fire();
    }

    /// Tells the controller that the application's teardown has finished.
    ///
    /// Must be called once the work started by the stop callback is done; the
    /// controller will not report `Stopped` before that. Calling it early is
    /// remembered for when the controller starts waiting.
    pub fn notify_shutdown_complete(&self) {
        self.completion.fire();
    }

    /// Returns `true` once a stop has been requested from either side.
    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_fired()
    }

    /// Returns `true` once the controller has finished.
    pub fn is_terminated(&self) -> bool {
        self.gate.is_terminated()
    }

    /// Returns `true` if the process runs under a service manager.
    pub fn is_supervised(&self) -> bool {
        self.gate.is_supervised()
    }

    /// Waits for the controller to finish, bounded by
    /// [`Config::termination_wait`](crate::Config::termination_wait).
    pub async fn wait_for_termination(&self) -> Termination {
        self.gate.wait(self.termination_wait).await
    }

    /// Waits for the controller to finish, bounded by `max_wait`.
    ///
    /// Returns [`Termination::Unsupervised`] immediately when the process is not
    /// running under a service manager.
    pub async fn wait_for_termination_within(&self, max_wait: Duration) -> Termination {
        self.gate.wait(max_wait).await
    }
}
