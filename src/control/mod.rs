//! Control plane: requests, single-fire signals and the event multiplexer.
//!
//! - [`request`]: [`ControlRequest`] as delivered by the service manager;
//! - [`signal`]: [`Signal`], the fire-once primitive behind stop/completion/exit;
//! - [`mux`]: merges inbound requests and the stop signal into one stream.

pub(crate) mod mux;
mod request;
mod signal;

pub use request::ControlRequest;
pub use signal::{Signal, SignalGuard};
