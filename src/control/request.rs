//! # Control requests from the service manager.
//!
//! Numeric codes follow the service-manager control values:
//! `Stop = 1`, `Interrogate = 4`, `Shutdown = 5`. Anything else is carried as
//! [`ControlRequest::Other`] and ignored by the session loop.

const CODE_STOP: u32 = 1;
const CODE_INTERROGATE: u32 = 4;
const CODE_SHUTDOWN: u32 = 5;

/// A control request delivered to a running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRequest {
    /// Asks the service to re-report its current status.
    Interrogate,
    /// Asks the service to stop.
    Stop,
    /// The system is shutting down.
    Shutdown,
    /// Any other control code.
    Other(u32),
}

impl ControlRequest {
    /// Maps a raw control code to a request.
    pub fn from_code(code: u32) -> Self {
        match code {
            CODE_STOP => ControlRequest::Stop,
            CODE_INTERROGATE => ControlRequest::Interrogate,
            CODE_SHUTDOWN => ControlRequest::Shutdown,
            other => ControlRequest::Other(other),
        }
    }

    /// Returns the raw control code.
    pub fn code(&self) -> u32 {
        match self {
            ControlRequest::Stop => CODE_STOP,
            ControlRequest::Interrogate => CODE_INTERROGATE,
            ControlRequest::Shutdown => CODE_SHUTDOWN,
            ControlRequest::Other(code) => *code,
        }
    }

    /// Returns `true` for `Stop` and `Shutdown`.
    #[inline]
    pub fn is_stop(&self) -> bool {
        matches!(self, ControlRequest::Stop | ControlRequest::Shutdown)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ControlRequest::Interrogate => "interrogate",
            ControlRequest::Stop => "stop",
            ControlRequest::Shutdown => "shutdown",
            ControlRequest::Other(_) => "other",
        }
    }
}
