//! Service status: states, accepted commands and the bounded reporter.
//!
//! - [`state`]: [`ServiceState`], [`Accepts`], [`Status`] (what is reported);
//! - [`reporter`]: [`StatusReporter`] (how it is reported, one bounded attempt per transition).

mod reporter;
mod state;

pub use reporter::StatusReporter;
pub use state::{Accepts, ServiceState, Status};
