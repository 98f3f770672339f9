//! Controller core: state machine, completion gate and host-facing API.
//!
//! The public API from this module is [`ServiceController`], [`ServiceHandle`],
//! the stop callback types and the completion gate's [`Termination`] outcome.
//!
//! Internal modules:
//! - [`session`]: the lifecycle state machine run by the platform dispatcher;
//! - [`controller`]: run-strategy selection, failure absorption, event fan-out;
//! - [`handle`]: stop request, completion notification, bounded termination wait;
//! - [`gate`]: bounded wait on the exit marker;
//! - [`stop`]: stop callback trait and closure adapter.

mod controller;
mod gate;
mod handle;
mod session;
mod stop;

pub use controller::{ControllerBuilder, ServiceController};
pub use gate::{CompletionGate, Termination};
pub use handle::ServiceHandle;
pub use stop::{StopFn, StopHandler, StopRef};
