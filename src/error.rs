//! Error types used by the svcvisor controller and platform boundary.
//!
//! This module defines two error enums:
//!
//! - [`ReportError`]: outcome of a single bounded status report.
//! - [`PlatformError`]: failures raised by a [`Platform`](crate::Platform) implementation.
//!
//! Neither is ever returned to the hosting application by
//! [`ServiceController`](crate::ServiceController): both are absorbed and logged.
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// # Errors produced while reporting a status transition.
///
/// A report is a single attempt; neither variant is retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The status sink did not accept the report within the deadline.
    #[error("status sink not ready within {timeout:?}")]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The status sink is gone (receiver dropped).
    #[error("status sink closed")]
    Closed,
}

impl ReportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use svcvisor::ReportError;
    /// use std::time::Duration;
    ///
    /// let err = ReportError::Timeout { timeout: Duration::from_millis(500) };
    /// assert_eq!(err.as_label(), "report_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReportError::Timeout { .. } => "report_timeout",
            ReportError::Closed => "report_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ReportError::Timeout { timeout } => format!("dropped after {timeout:?}"),
            ReportError::Closed => "sink closed".to_string(),
        }
    }
}

/// # Errors produced at the platform boundary.
///
/// Only [`PlatformError::NotAService`] is an expected outcome; it is what a
/// dispatcher reports when the process turns out to be a console process
/// rather than a registered service.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Could not determine whether the session is interactive or supervised.
    #[error("session query failed: {error}")]
    Query {
        /// The underlying error message.
        error: String,
    },

    /// The process is not running as a service; no handler could be registered.
    #[error("not running as a service")]
    NotAService,

    /// Registering with the service manager failed.
    #[error("service registration failed: {error}")]
    Registration {
        /// The underlying error message.
        error: String,
    },
}

impl PlatformError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use svcvisor::PlatformError;
    ///
    /// let err = PlatformError::Registration { error: "access denied".into() };
    /// assert_eq!(err.as_label(), "platform_registration");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PlatformError::Query { .. } => "platform_query",
            PlatformError::NotAService => "platform_not_a_service",
            PlatformError::Registration { .. } => "platform_registration",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PlatformError::Query { error } => format!("query: {error}"),
            PlatformError::NotAService => "not a service".to_string(),
            PlatformError::Registration { error } => format!("registration: {error}"),
        }
    }

    /// Indicates whether the error is an expected, benign outcome.
    ///
    /// Returns `true` only for [`PlatformError::NotAService`].
    ///
    /// # Example
    /// ```
    /// use svcvisor::PlatformError;
    ///
    /// assert!(PlatformError::NotAService.is_benign());
    /// assert!(!PlatformError::Query { error: "denied".into() }.is_benign());
    /// ```
    pub fn is_benign(&self) -> bool {
        matches!(self, PlatformError::NotAService)
    }
}

/// Extracts a printable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
