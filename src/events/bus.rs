//! # Lifecycle event bus.
//!
//! The reporter and the session publish into one [`tokio::sync::broadcast`] ring;
//! the controller's listener and any [`ServiceController::subscribe`](crate::ServiceController::subscribe)
//! receivers read from it.
//!
//! Publishing is fire-and-forget and never waits on a reader, so observers cannot
//! delay a status report or the stop sequence. A reader that falls more than
//! `capacity` events behind sees `RecvError::Lagged(n)` and resumes at the oldest
//! retained event. Events published while nobody listens are gone.

use tokio::sync::broadcast;

use super::event::Event;

/// Shared publishing end of the lifecycle event ring.
#[derive(Clone, Debug)]
pub struct Bus {
    ring: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus retaining up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (ring, _) = broadcast::channel(capacity.max(1));
        Self { ring }
    }

    /// Publishes `event`; dropped silently when nobody is listening.
    pub fn publish(&self, event: Event) {
        if self.ring.send(event).is_err() {
            // no receivers
        }
    }

    /// Returns a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.ring.subscribe()
    }
}
