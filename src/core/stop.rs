//! # Stop callback abstraction and function-backed implementation.
//!
//! The [`StopHandler`] trait is the host application's hook into the stop sequence.
//! It runs once per controller lifetime, right after `StopPending` was reported, and
//! the session waits for it to return before waiting on the completion signal.
//!
//! The handler owns its own shutdown deadline; the session imposes no timeout on it.
//! A handler that only *starts* teardown should return early and have the host call
//! [`ServiceHandle::notify_shutdown_complete`](crate::ServiceHandle::notify_shutdown_complete)
//! once teardown has actually finished.
//!
//! ## Example
//! ```rust
//! use svcvisor::{StopFn, StopRef};
//! use tokio_util::sync::CancellationToken;
//!
//! let app = CancellationToken::new();
//! let on_stop: StopRef = StopFn::arc({
//!     let app = app.clone();
//!     move || {
//!         let app = app.clone();
//!         async move { app.cancel() }
//!     }
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// Host-supplied procedure invoked when a stop trigger is accepted.
#[async_trait]
pub trait StopHandler: Send + Sync + 'static {
    /// Performs (or kicks off) the application's graceful shutdown.
    async fn on_stop(&self);
}

/// Shared handle to a stop handler.
pub type StopRef = Arc<dyn StopHandler>;

/// Function-backed stop handler.
///
/// Wraps a closure that *creates* the shutdown future when invoked.
#[derive(Debug)]
pub struct StopFn<F> {
    f: F,
}

impl<F> StopFn<F> {
    /// Creates a new function-backed stop handler.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> StopHandler for StopFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_stop(&self) {
        (self.f)().await
    }
}
