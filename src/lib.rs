//! # svcvisor
//!
//! **svcvisor** bridges an operating system's service manager with an application's
//! own shutdown logic.
//!
//! Two independent stop triggers exist in a supervised process: the service manager
//! may send `Stop`/`Shutdown`, and the application itself may decide to stop (Ctrl-C,
//! an internal fault). Both converge on exactly one shutdown sequence, status
//! transitions are reported in order, and no report can stall the controller.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   service manager                                   host application
//!   ┌──────────────┐                          ┌──────────────────────────────┐
//!   │   Platform   │                          │        ServiceHandle         │
//!   │ (dispatch)   │                          │ request_stop()               │
//!   └──┬────────▲──┘                          │ notify_shutdown_complete()   │
//!      │        │                             │ wait_for_termination()       │
//!      │ requests│ status                     └──┬───────────┬───────────▲───┘
//!      ▼        │                                │ stop       │ completion│ exit
//! ┌─────────────┴───────────────────────────────┼────────────┼───────────┼───┐
//! │  Session (lifecycle state machine)           │            │           │   │
//! │                                              ▼            │           │   │
//! │   requests ──► mux task ◄── stop signal ─────┘            │           │   │
//! │                   │ (Shutdown synthesized on stop)        │           │   │
//! │                   ▼                                       │           │   │
//! │   StartPending ─► Running ─► [loop] ─► StopPending ─► on_stop()       │   │
//! │                                          ─► wait completion ◄─┘       │   │
//! │                                          ─► Stopped                   │   │
//! │   every report ─► StatusReporter (500 ms, single attempt)             │   │
//! └──────────────────────────────────────────────────────────────────────┼───┘
//!                                         ServiceController::start returns ─┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! ServiceController::start(on_stop)
//!   ├─► platform.is_interactive()  (Err → log, abstain)
//!   ├─► Interactive → Console (termination signals → Stop)
//!   ├─► Supervised  → platform.dispatch()
//!   │                   (NotAService → info, other Err → error)
//!   └─► exit marker fired
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Controller**    | Start, stop from either side, bounded termination wait.          | [`ServiceController`], [`ServiceHandle`]    |
//! | **Stop callback** | Host hook invoked once when a stop trigger is accepted.          | [`StopHandler`], [`StopFn`]                 |
//! | **Platforms**     | Where requests come from and where status goes.                  | [`Platform`], [`Console`], [`ChannelPlatform`] |
//! | **Status**        | States, accepted commands, bounded reporting.                    | [`ServiceState`], [`Status`], [`StatusReporter`] |
//! | **Events**        | Lifecycle events for observability.                              | [`Event`], [`Subscribe`]                    |
//! | **Errors**        | Typed errors for the reporter and the platform boundary.         | [`ReportError`], [`PlatformError`]          |
//!
//! ## Optional features
//! - `logging`: exports a [`LogWriter`] subscriber that renders events with `tracing`.
//!
//! ## Example
//! ```rust,no_run
//! use svcvisor::{Config, Console, ServiceController, StopFn};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = ServiceController::builder(Config::default())
//!         .with_platform(Console::default())
//!         .build();
//!     let handle = controller.handle();
//!     let app = CancellationToken::new();
//!
//!     let on_stop = StopFn::arc({
//!         let app = app.clone();
//!         move || {
//!             let app = app.clone();
//!             async move { app.cancel() }
//!         }
//!     });
//!     let service = tokio::spawn(controller.start(on_stop));
//!
//!     app.cancelled().await;
//!     // ... application teardown ...
//!     handle.notify_shutdown_complete();
//!
//!     let _ = service.await;
//!     handle.wait_for_termination().await;
//! }
//! ```

mod config;
mod control;
mod core;
mod error;
mod events;
mod platform;
mod status;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use control::{ControlRequest, Signal, SignalGuard};
pub use crate::core::{
    CompletionGate, ControllerBuilder, ServiceController, ServiceHandle, StopFn, StopHandler,
    StopRef, Termination,
};
pub use error::{PlatformError, ReportError};
pub use events::{Bus, Event, EventKind};
pub use platform::{ChannelPlatform, ChannelRemote, Console, Detached, Platform, RunMode, Service};
pub use status::{Accepts, ServiceState, Status, StatusReporter};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
