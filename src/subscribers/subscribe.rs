//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], an extension point for plugging custom event handlers into
//! the controller.
//!
//! ## Rules
//! - Each subscriber has a dedicated worker and a bounded queue.
//! - A slow subscriber only affects its own queue; it never delays a status report.
//! - Queue overflow drops the event **for this subscriber only** and publishes
//!   `EventKind::SubscriberOverflow`.
//! - Panics are caught and published as `EventKind::SubscriberPanicked`.

use async_trait::async_trait;

use crate::events::Event;

/// Lifecycle event subscriber.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task; events arrive in FIFO order per subscriber.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber (clamped to ≥ 1).
    ///
    /// Default: 256.
    fn queue_capacity(&self) -> usize {
        256
    }
}
