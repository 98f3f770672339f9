//! # Service states and status tuples.
//!
//! A session moves strictly forward:
//! ```text
//! StartPending ──► Running ──► StopPending ──► Stopped
//! ```
//! No state is revisited. Every transition is reported to the service manager as a
//! [`Status`], i.e. a `(state, accepted commands)` pair.

use std::fmt;
use std::ops::BitOr;

/// Lifecycle state of the service as seen by the service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceState {
    /// The service is starting.
    StartPending,
    /// The service is running and accepts control requests.
    Running,
    /// A stop trigger was accepted; the application is tearing down.
    StopPending,
    /// Terminal state.
    Stopped,
}

impl ServiceState {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceState::StartPending => "start_pending",
            ServiceState::Running => "running",
            ServiceState::StopPending => "stop_pending",
            ServiceState::Stopped => "stopped",
        }
    }

    /// Returns `true` only for [`ServiceState::Stopped`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceState::Stopped)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Set of control commands the service accepts in its current state.
///
/// Only stop and shutdown are ever advertised, and only while `Running`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Accepts(u8);

impl Accepts {
    /// No commands accepted.
    pub const NONE: Accepts = Accepts(0);
    /// Accepts stop requests.
    pub const STOP: Accepts = Accepts(1);
    /// Accepts system shutdown notifications.
    pub const SHUTDOWN: Accepts = Accepts(1 << 2);

    /// Returns `true` if every command in `other` is accepted.
    #[inline]
    pub fn contains(self, other: Accepts) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no command is accepted.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit representation (matches service-manager accept flags).
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Accepts {
    type Output = Accepts;

    fn bitor(self, rhs: Accepts) -> Accepts {
        Accepts(self.0 | rhs.0)
    }
}

/// A status transition delivered to the service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    /// Reported state.
    pub state: ServiceState,
    /// Commands accepted in this state.
    pub accepts: Accepts,
}

impl Status {
    /// Creates a status that accepts no commands.
    pub fn new(state: ServiceState) -> Self {
        Self {
            state,
            accepts: Accepts::NONE,
        }
    }

    /// Creates a `Running` status advertising `accepts`.
    pub fn running(accepts: Accepts) -> Self {
        Self {
            state: ServiceState::Running,
            accepts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_are_ordered_forward() {
        assert!(ServiceState::StartPending < ServiceState::Running);
        assert!(ServiceState::Running < ServiceState::StopPending);
        assert!(ServiceState::StopPending < ServiceState::Stopped);
        assert!(ServiceState::Stopped.is_terminal());
        assert!(!ServiceState::StopPending.is_terminal());
    }

    #[test]
    fn test_accepts_set_operations() {
        let both = Accepts::STOP | Accepts::SHUTDOWN;
        assert!(both.contains(Accepts::STOP));
        assert!(both.contains(Accepts::SHUTDOWN));
        assert!(!Accepts::STOP.contains(Accepts::SHUTDOWN));
        assert!(Accepts::NONE.is_empty());
        assert_eq!(both.bits(), 0b101);
    }

    #[test]
    fn test_status_constructors() {
        assert!(Status::new(ServiceState::StopPending).accepts.is_empty());
        let running = Status::running(Accepts::STOP);
        assert_eq!(running.state, ServiceState::Running);
        assert!(running.accepts.contains(Accepts::STOP));
    }
}
