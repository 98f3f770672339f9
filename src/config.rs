//! # Controller configuration.
//!
//! Provides [`Config`] centralized settings for the service controller.
//!
//! All timing values default to what service managers tolerate in practice:
//! a status report that is not accepted within 500 ms is dropped, and a host
//! waiting for termination gives up after 500 ms.
//!
//! ## Sentinel values
//! - `status_capacity = 0` → clamped to 1
//! - `bus_capacity = 0` → clamped to 1

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

/// Configuration for [`ServiceController`](crate::ServiceController).
///
/// ## Field semantics
/// - `name`: service name handed to the platform dispatcher
/// - `report_timeout`: deadline for one status report attempt
/// - `interrogate_pause`: pause between the two status echoes sent on `Interrogate`
/// - `termination_wait`: default bound for [`ServiceHandle::wait_for_termination`](crate::ServiceHandle::wait_for_termination)
/// - `status_capacity`: status channel size for in-crate run strategies (min 1)
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Service name passed to [`Platform::dispatch`](crate::Platform::dispatch).
    pub name: String,

    /// Deadline for a single status report.
    ///
    /// A report the sink does not accept in time is dropped, logged at debug
    /// level and never retried.
    pub report_timeout: Duration,

    /// Pause between the two status echoes answering an `Interrogate` request.
    pub interrogate_pause: Duration,

    /// Default maximum wait used by the completion gate.
    pub termination_wait: Duration,

    /// Capacity of status channels created by [`Console`](crate::Console) and
    /// [`ChannelPlatform`](crate::ChannelPlatform).
    pub status_capacity: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the status channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn status_capacity_clamped(&self) -> usize {
        self.status_capacity.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `name` = executable file stem (or `"service"`)
    /// - `report_timeout = 500ms`
    /// - `interrogate_pause = 100ms`
    /// - `termination_wait = 500ms`
    /// - `status_capacity = 8`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            name: default_name(),
            report_timeout: Duration::from_millis(500),
            interrogate_pause: Duration::from_millis(100),
            termination_wait: Duration::from_millis(500),
            status_capacity: 8,
            bus_capacity: 256,
        }
    }
}

fn default_name() -> String {
    name_from(std::env::args_os().next())
}

/// Derives a service name from the executable path; non-UTF-8 bytes are replaced.
fn name_from(arg0: Option<OsString>) -> String {
    arg0.as_deref()
        .and_then(|arg0| Path::new(arg0).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "service".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_manager_timeouts() {
        let cfg = Config::default();
        assert_eq!(cfg.report_timeout, Duration::from_millis(500));
        assert_eq!(cfg.termination_wait, Duration::from_millis(500));
        assert_eq!(cfg.interrogate_pause, Duration::from_millis(100));
        assert!(!cfg.name.is_empty());
    }

    #[test]
    fn test_name_from_executable_path() {
        assert_eq!(name_from(Some("/usr/bin/agent.exe".into())), "agent");
        assert_eq!(name_from(Some("".into())), "service");
        assert_eq!(name_from(None), "service");
    }

    #[cfg(unix)]
    #[test]
    fn test_name_from_non_utf8_path_does_not_panic() {
        use std::os::unix::ffi::OsStringExt;

        let arg0 = OsString::from_vec(b"/tmp/svc_\xFF".to_vec());
        assert_eq!(name_from(Some(arg0)), "svc_\u{FFFD}");
    }

    #[test]
    fn test_capacities_are_clamped() {
        let cfg = Config {
            status_capacity: 0,
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.status_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
