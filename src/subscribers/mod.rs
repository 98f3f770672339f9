//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out used
//! to deliver lifecycle events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! StatusReporter / Session ── publish(Event) ──► Bus ──► listener (ServiceController::start)
//!                                                              │
//!                                                              ▼
//!                                                        SubscriberSet
//!                                                    ┌─────────┼─────────┐
//!                                                    ▼         ▼         ▼
//!                                                 LogWriter  Metrics   Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use svcvisor::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::StatusDropped {
//!             // record the dropped report
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
