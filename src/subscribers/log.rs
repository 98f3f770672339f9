//! # LogWriter: lifecycle events rendered through `tracing`
//!
//! A minimal subscriber that logs incoming [`Event`]s under the `svcvisor::events` target.
//!
//! ## Example output
//! ```text
//! DEBUG svcvisor::events: status reported state=start_pending
//! DEBUG svcvisor::events: control received code=4
//!  INFO svcvisor::events: stop requested trigger=stop
//! DEBUG svcvisor::events: status dropped state=stopped reason=report_timeout
//!  INFO svcvisor::events: session finished
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let state = e.state.map(|s| s.as_label()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::StatusReported => {
                tracing::debug!(target: "svcvisor::events", state, "status reported");
            }
            EventKind::StatusDropped => {
                tracing::debug!(target: "svcvisor::events", state, reason, "status dropped");
            }
            EventKind::ControlReceived => {
                tracing::debug!(target: "svcvisor::events", code = e.code, "control received");
            }
            EventKind::ControlIgnored => {
                tracing::debug!(target: "svcvisor::events", code = e.code, "control ignored");
            }
            EventKind::StopRequested => {
                tracing::info!(target: "svcvisor::events", trigger = reason, "stop requested");
            }
            EventKind::StopCallbackInvoked => {
                tracing::debug!(target: "svcvisor::events", "stop callback invoked");
            }
            EventKind::StopCallbackPanicked => {
                tracing::warn!(target: "svcvisor::events", reason, "stop callback panicked");
            }
            EventKind::ShutdownCompleted => {
                tracing::debug!(target: "svcvisor::events", "shutdown completed");
            }
            EventKind::SessionFinished => {
                tracing::info!(target: "svcvisor::events", "session finished");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                tracing::warn!(target: "svcvisor::events", reason, kind = ?e.kind, "subscriber fault");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
