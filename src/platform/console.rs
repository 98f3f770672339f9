//! # Console: the interactive run strategy.
//!
//! Runs a [`Service`] in the foreground as a debugging stand-in for the service
//! manager:
//! ```text
//! termination signal ──► ControlRequest::Stop ──► requests ──► service.execute()
//! service.execute()  ──► changes ──► drain (debug log)
//! ```
//! Every termination signal becomes one `Stop` request; the session honors the
//! first and the rest are dropped once it stops listening.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    control::ControlRequest,
    error::PlatformError,
    platform::{Platform, Service, os_signals},
    status::Status,
};

/// Interactive platform: termination signals are delivered as `Stop` requests.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    status_capacity: usize,
}

impl Console {
    /// Creates a console runner whose status drain buffers `status_capacity` reports.
    pub fn new(status_capacity: usize) -> Self {
        Self {
            status_capacity: status_capacity.max(1),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl Platform for Console {
    fn is_interactive(&self) -> Result<bool, PlatformError> {
        Ok(true)
    }

    fn is_service(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn dispatch(&self, name: &str, service: Arc<dyn Service>) -> Result<(), PlatformError> {
        let (req_tx, req_rx) = mpsc::channel(1);
        let (status_tx, mut status_rx) = mpsc::channel::<Status>(self.status_capacity);

        let signals = tokio::spawn(async move {
            loop {
                if let Err(e) = os_signals::wait_for_shutdown_signal().await {
                    tracing::warn!(error = %e, "cannot listen for termination signals");
                    return;
                }
                tracing::info!("termination signal received; requesting stop");
                if req_tx.send(ControlRequest::Stop).await.is_err() {
                    return;
                }
            }
        });

        let service_name = name.to_owned();
        let drain = tokio::spawn(async move {
            while let Some(status) = status_rx.recv().await {
                tracing::debug!(service = %service_name, state = %status.state, "console status");
            }
        });

        service.execute(req_rx, status_tx).await;

        signals.abort();
        let _ = drain.await;
        Ok(())
    }
}
