//! # Lifecycle events emitted by the service session.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Status events**: reports delivered to or dropped by the status sink
//! - **Control events**: requests received from the service manager (or synthesized)
//! - **Stop sequence events**: trigger accepted, callback invoked, completion observed
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! reported state, the raw control code and a reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use svcvisor::{Event, EventKind, ServiceState};
//!
//! let ev = Event::new(EventKind::StatusReported).with_state(ServiceState::Running);
//!
//! assert_eq!(ev.kind, EventKind::StatusReported);
//! assert_eq!(ev.state, Some(ServiceState::Running));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::status::ServiceState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and "full" / "closed"
    SubscriberOverflow,

    // === Status events ===
    /// The status sink accepted a report.
    ///
    /// Sets:
    /// - `state`: reported state
    StatusReported,

    /// The status sink did not accept a report in time (or was closed).
    ///
    /// Sets:
    /// - `state`: state that was dropped
    /// - `reason`: error label
    StatusDropped,

    // === Control events ===
    /// A control request reached the session loop.
    ///
    /// Sets:
    /// - `code`: numeric control code
    ControlReceived,

    /// A control request with an unexpected code was ignored.
    ///
    /// Sets:
    /// - `code`: numeric control code
    ControlIgnored,

    // === Stop sequence ===
    /// A stop-class trigger was accepted; the session leaves `Running`.
    ///
    /// Sets:
    /// - `reason`: `"stop"` or `"shutdown"`
    StopRequested,

    /// The stop callback is about to run.
    StopCallbackInvoked,

    /// The stop callback panicked; the stop sequence continues.
    ///
    /// Sets:
    /// - `reason`: panic message
    StopCallbackPanicked,

    /// The host application reported its teardown as complete.
    ShutdownCompleted,

    /// The session reported `Stopped` and returned.
    SessionFinished,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Service state involved in the event, if any.
    pub state: Option<ServiceState>,
    /// Raw control code, if any.
    pub code: Option<u32>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            state: None,
            code: None,
            reason: None,
        }
    }

    /// Attaches a service state.
    #[inline]
    pub fn with_state(mut self, state: ServiceState) -> Self {
        self.state = Some(state);
        self
    }

    /// Attaches a raw control code.
    #[inline]
    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ControlReceived);
        let b = Event::new(EventKind::ControlReceived);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_overflow_event_carries_subscriber() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
    }
}
