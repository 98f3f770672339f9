//! # Detached platform: no service manager present.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::PlatformError,
    platform::{Platform, Service},
};

/// Platform for processes that never run under a service manager.
///
/// Not interactive, not a service; [`Platform::dispatch`] reports
/// [`PlatformError::NotAService`], so `start` returns immediately and the host
/// runs unsupervised.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

#[async_trait]
impl Platform for Detached {
    fn is_interactive(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    fn is_service(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn dispatch(&self, _name: &str, _service: Arc<dyn Service>) -> Result<(), PlatformError> {
        Err(PlatformError::NotAService)
    }
}
