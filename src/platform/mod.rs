//! Platform boundary: where control requests come from and where status goes.
//!
//! The controller never talks to a service manager directly. A [`Platform`]
//! answers two questions (is the session interactive? is the process a service?)
//! and, when asked to dispatch, registers with its service manager and drives a
//! [`Service`] with a request channel and a status sink.
//!
//! ## Run strategies
//! ```text
//! start()
//!   └─► platform.is_interactive()
//!         ├─ Err      ─► log error, abstain
//!         ├─ Ok(true) ─► RunMode::Interactive ─► Console::dispatch   (Ctrl-C → Stop)
//!         └─ Ok(false)─► RunMode::Supervised  ─► platform.dispatch   (service manager)
//! ```
//! Both strategies hand the same [`Service`] the same kind of channels; the
//! session cannot tell them apart.
//!
//! ## Built-in platforms
//! - [`Detached`]: no service manager; dispatch reports "not a service".
//! - [`Console`]: interactive strategy; requests come from termination signals.
//! - [`ChannelPlatform`]: supervised strategy over in-memory channels, for embedding
//!   a custom transport (and for tests).

mod channel;
mod console;
mod detached;
mod os_signals;

pub use channel::{ChannelPlatform, ChannelRemote};
pub use console::Console;
pub use detached::Detached;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{control::ControlRequest, error::PlatformError, status::Status};

/// Something a platform dispatcher can run: the lifecycle state machine.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Runs the service until it reports `Stopped`.
    ///
    /// `requests` carries control requests from the service manager; `changes`
    /// is the status sink. The dispatcher treats the service as stopped once this
    /// returns.
    async fn execute(
        &self,
        requests: mpsc::Receiver<ControlRequest>,
        changes: mpsc::Sender<Status>,
    );
}

/// Host platform capabilities and service-manager dispatch.
#[async_trait]
pub trait Platform: Send + Sync + 'static {
    /// Returns `true` if the process runs in an interactive session.
    fn is_interactive(&self) -> Result<bool, PlatformError>;

    /// Returns `true` if the process runs under a service manager.
    fn is_service(&self) -> Result<bool, PlatformError>;

    /// Registers `service` under `name` and runs it to completion.
    ///
    /// Return [`PlatformError::NotAService`] when the process turns out not to be
    /// a service; any other error is treated as a registration failure.
    async fn dispatch(&self, name: &str, service: Arc<dyn Service>) -> Result<(), PlatformError>;
}

/// How control requests are sourced for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive session: termination signals stand in for the service manager.
    Interactive,
    /// Running under a service manager.
    Supervised,
}

impl RunMode {
    /// Selects the strategy from an interactive-session query result.
    pub fn from_interactive(interactive: bool) -> Self {
        if interactive {
            RunMode::Interactive
        } else {
            RunMode::Supervised
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunMode::Interactive => "interactive",
            RunMode::Supervised => "supervised",
        }
    }
}
