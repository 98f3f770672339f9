//! # ServiceController: bridges a service manager and the host's shutdown logic.
//!
//! The [`ServiceController`] owns the three single-fire signals (stop, completion,
//! exit), the event bus and the platform. It is constructed once at startup,
//! handed to the entry point that runs the application, and consumed by
//! [`ServiceController::start`].
//!
//! ## Key responsibilities
//! - pick the run strategy once ([`RunMode`]) from the platform's interactive query
//! - dispatch a [`Session`] through that strategy and wait for it to finish
//! - absorb every platform failure (log it, run unsupervised)
//! - fire the exit marker on every return path
//! - fan out lifecycle events to subscribers
//!
//! ## High-level architecture
//! ```text
//! ServiceController::start(on_stop)
//!   ├─► exit guard (fires exit marker once run() is over)
//!   ├─► listener: Bus ─► SubscriberSet (if any subscribers)
//!   ├─► platform.is_interactive()
//!   │     ├─ Err        ─► error!, return
//!   │     └─ Ok(mode)
//!   ├─► Session::new(stop, completion, on_stop)
//!   ├─► dispatch:
//!   │     ├─ Interactive ─► Console::dispatch(name, session)
//!   │     └─ Supervised  ─► platform.dispatch(name, session)
//!   └─► result:
//!         ├─ Ok            ─► (session reached Stopped)
//!         ├─ NotAService   ─► info!, return
//!         └─ other error   ─► error!, return
//!   then: exit marker ─► subscriber drain (bounded by termination_wait)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use svcvisor::{ChannelPlatform, Config, ControlRequest, ServiceController, StopFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let (platform, remote) = ChannelPlatform::new(8);
//!     let controller = ServiceController::builder(Config::default())
//!         .with_platform(platform)
//!         .build();
//!     let handle = controller.handle();
//!
//!     let on_stop = StopFn::arc({
//!         let handle = handle.clone();
//!         move || {
//!             let handle = handle.clone();
//!             async move { handle.notify_shutdown_complete() }
//!         }
//!     });
//!
//!     remote.requests.send(ControlRequest::Stop).await.unwrap();
//!     controller.start(on_stop).await;
//!     assert!(handle.is_terminated());
//! }
//! ```

use std::sync::Arc;

use tokio::{sync::broadcast, task::JoinHandle, time};

use crate::{
    config::Config,
    control::Signal,
    core::{
        gate::CompletionGate,
        handle::ServiceHandle,
        session::Session,
        stop::StopRef,
    },
    events::{Bus, Event},
    platform::{Console, Detached, Platform, RunMode},
    subscribers::{Subscribe, SubscriberSet},
};

/// Lifecycle controller for one run of the process.
pub struct ServiceController {
    cfg: Config,
    platform: Arc<dyn Platform>,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    stop: Signal,
    completion: Signal,
    exited: Signal,
}

impl ServiceController {
    /// Creates a controller over `platform` with no subscribers.
    pub fn new(cfg: Config, platform: Arc<dyn Platform>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            platform,
            bus,
            subscribers: Vec::new(),
            stop: Signal::new(),
            completion: Signal::new(),
            exited: Signal::new(),
        }
    }

    /// Returns a builder; the platform defaults to [`Detached`].
    pub fn builder(cfg: Config) -> ControllerBuilder {
        ControllerBuilder::new(cfg)
    }

    /// Returns a handle for stopping the controller and awaiting its termination.
    pub fn handle(&self) -> ServiceHandle {
        ServiceHandle::new(
            self.stop.clone(),
            self.completion.clone(),
            CompletionGate::new(self.exited.clone(), Arc::clone(&self.platform)),
            self.cfg.termination_wait,
        )
    }

    /// Subscribes to lifecycle events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs the controller until the session reports `Stopped`.
    ///
    /// Returns early (without invoking `on_stop`) when the session mode cannot be
    /// determined or the platform cannot register the service; both are logged and
    /// the host is left to run unsupervised.
    ///
    /// The exit marker fires as soon as the session is over. Subscribers then get
    /// up to [`Config::termination_wait`] to drain; a subscriber still busy after
    /// that is left running in the background.
    pub async fn start(self, on_stop: StopRef) {
        let exit = self.exited.guard();
        let listener = self.subscriber_listener();

        self.run(on_stop).await;
        drop(exit);

        if let Some((done, handle)) = listener {
            done.fire();
            if time::timeout(self.cfg.termination_wait, handle).await.is_err() {
                tracing::warn!(
                    waited = ?self.cfg.termination_wait,
                    "event subscribers still draining; detaching"
                );
            }
        }
    }

    async fn run(&self, on_stop: StopRef) {
        let mode = match self.platform.is_interactive() {
            Ok(interactive) => RunMode::from_interactive(interactive),
            Err(e) => {
                tracing::error!(
                    label = e.as_label(),
                    detail = %e.as_message(),
                    "cannot determine session mode; service controller not started"
                );
                return;
            }
        };
        tracing::debug!(mode = mode.as_label(), "service session mode detected");

        let session = Arc::new(Session::new(
            &self.cfg,
            self.stop.clone(),
            self.completion.clone(),
            on_stop,
            self.bus.clone(),
        ));

        let res = match mode {
            RunMode::Interactive => {
                Console::new(self.cfg.status_capacity_clamped())
                    .dispatch(&self.cfg.name, session)
                    .await
            }
            RunMode::Supervised => self.platform.dispatch(&self.cfg.name, session).await,
        };

        match res {
            Ok(()) => {}
            Err(e) if e.is_benign() => {
                tracing::info!(
                    "attempted to register service handlers, but this is not a service; no action necessary"
                );
            }
            Err(e) => {
                tracing::error!(label = e.as_label(), detail = %e.as_message(), "service setup failed");
            }
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set until `done` fires.
    fn subscriber_listener(&self) -> Option<(Signal, JoinHandle<()>)> {
        if self.subscribers.is_empty() {
            return None;
        }
        let set = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());
        let mut rx = self.bus.subscribe();
        let done = Signal::new();
        let stop_listening = done.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    ev = rx.recv() => match ev {
                        Ok(ev) => set.emit(&ev),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "event listener lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = stop_listening.fired() => break,
                }
            }
            set.shutdown().await;
        });
        Some((done, handle))
    }
}

/// Builder for [`ServiceController`].
pub struct ControllerBuilder {
    cfg: Config,
    platform: Option<Arc<dyn Platform>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ControllerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            platform: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the platform the controller dispatches through.
    pub fn with_platform(mut self, platform: impl Platform) -> Self {
        self.platform = Some(Arc::new(platform));
        self
    }

    /// Sets the platform from a shared handle.
    pub fn with_platform_arc(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets event subscribers.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the controller.
    pub fn build(self) -> ServiceController {
        let platform = self.platform.unwrap_or_else(|| Arc::new(Detached));
        let mut controller = ServiceController::new(self.cfg, platform);
        controller.subscribers = self.subscribers;
        controller
    }
}
