//! # In-memory channel platform.
//!
//! [`ChannelPlatform`] is a supervised strategy whose "service manager" is whoever
//! holds the matching [`ChannelRemote`]: it pushes [`ControlRequest`]s and reads
//! [`Status`] reports. Use it to bridge a custom transport, or to drive the
//! controller from tests.
//!
//! ```text
//! ChannelRemote.requests ──► (dispatch) ──► service.execute(requests, changes)
//! ChannelRemote.changes  ◄──────────────────────────────────────────┘
//! ```
//! The channels are handed over on the first dispatch; the status sink closes
//! when the service returns.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::{
    control::ControlRequest,
    error::PlatformError,
    platform::{Platform, Service},
    status::Status,
};

type Endpoints = (mpsc::Receiver<ControlRequest>, mpsc::Sender<Status>);

/// Supervised platform backed by in-memory channels.
pub struct ChannelPlatform {
    endpoints: Mutex<Option<Endpoints>>,
    interactive: bool,
    service: bool,
}

/// Service-manager side of a [`ChannelPlatform`].
pub struct ChannelRemote {
    /// Control requests delivered to the running service.
    pub requests: mpsc::Sender<ControlRequest>,
    /// Status reports emitted by the running service.
    pub changes: mpsc::Receiver<Status>,
}

impl ChannelPlatform {
    /// Creates a platform and its remote; both channels hold `capacity` items (min 1).
    ///
    /// By default the session is not interactive and the process counts as a service.
    pub fn new(capacity: usize) -> (Self, ChannelRemote) {
        let capacity = capacity.max(1);
        let (req_tx, req_rx) = mpsc::channel(capacity);
        let (status_tx, status_rx) = mpsc::channel(capacity);
        (
            Self {
                endpoints: Mutex::new(Some((req_rx, status_tx))),
                interactive: false,
                service: true,
            },
            ChannelRemote {
                requests: req_tx,
                changes: status_rx,
            },
        )
    }

    /// Overrides the interactive-session answer.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Overrides the running-as-service answer.
    pub fn with_service(mut self, service: bool) -> Self {
        self.service = service;
        self
    }
}

#[async_trait]
impl Platform for ChannelPlatform {
    fn is_interactive(&self) -> Result<bool, PlatformError> {
        Ok(self.interactive)
    }

    fn is_service(&self) -> Result<bool, PlatformError> {
        Ok(self.service)
    }

    async fn dispatch(&self, name: &str, service: Arc<dyn Service>) -> Result<(), PlatformError> {
        let Some((requests, changes)) = self.endpoints.lock().await.take() else {
            return Err(PlatformError::Registration {
                error: format!("channels for {name} already dispatched"),
            });
        };
        tracing::debug!(service = name, "dispatching over in-memory channels");
        service.execute(requests, changes).await;
        Ok(())
    }
}
