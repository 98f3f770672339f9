//! # Bounded, single-attempt status reporting.
//!
//! [`StatusReporter`] delivers one [`Status`] to the service manager's sink.
//!
//! ```text
//! report(status)
//!     ├─► timeout(report_timeout, sink.send(status))
//!     │       ├─ accepted  ──► publish StatusReported ──► Ok(())
//!     │       ├─ elapsed   ──► publish StatusDropped  ──► Err(Timeout)
//!     │       └─ closed    ──► publish StatusDropped  ──► Err(Closed)
//!     └─► (never retried)
//! ```
//!
//! ## Rules
//! - One attempt per transition; a dropped report is not fatal because the
//!   service manager polls the current state on its own cadence.
//! - A report never blocks its caller for longer than `timeout`.

use std::time::Duration;

use tokio::{sync::mpsc, time};

use crate::{
    error::ReportError,
    events::{Bus, Event, EventKind},
    status::Status,
};

/// Timeout-guarded sender of status transitions.
#[derive(Clone, Debug)]
pub struct StatusReporter {
    sink: mpsc::Sender<Status>,
    timeout: Duration,
    bus: Bus,
}

impl StatusReporter {
    /// Creates a reporter over `sink`, bounding every report by `timeout`.
    pub fn new(sink: mpsc::Sender<Status>, timeout: Duration, bus: Bus) -> Self {
        Self { sink, timeout, bus }
    }

    /// Attempts to deliver `status` once.
    ///
    /// Returns [`ReportError::Timeout`] if the sink did not accept the report within
    /// the deadline and [`ReportError::Closed`] if the sink is gone.
    pub async fn report(&self, status: Status) -> Result<(), ReportError> {
        let res = match time::timeout(self.timeout, self.sink.send(status)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_closed)) => Err(ReportError::Closed),
            Err(_elapsed) => Err(ReportError::Timeout {
                timeout: self.timeout,
            }),
        };

        match &res {
            Ok(()) => {
                self.bus
                    .publish(Event::new(EventKind::StatusReported).with_state(status.state));
            }
            Err(e) => {
                tracing::debug!(
                    state = %status.state,
                    error = e.as_label(),
                    detail = %e.as_message(),
                    "status report dropped"
                );
                self.bus.publish(
                    Event::new(EventKind::StatusDropped)
                        .with_state(status.state)
                        .with_reason(e.as_label()),
                );
            }
        }
        res
    }
}
