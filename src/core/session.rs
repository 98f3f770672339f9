//! # Session: the lifecycle state machine.
//!
//! A [`Session`] is what the platform dispatcher runs once it has registered the
//! process with the service manager. It owns the current state for the whole run.
//!
//! ## Lifecycle
//! ```text
//! execute(requests, changes)
//!   ├─► report StartPending
//!   ├─► report Running { accepts: STOP | SHUTDOWN }
//!   ├─► mux::spawn(requests, stop) ──► combined
//!   │
//!   ├─► loop over combined {
//!   │     Interrogate    ─► report current, sleep(interrogate_pause), report current
//!   │     Stop/Shutdown  ─► break
//!   │     Other(code)    ─► log, ignore
//!   │   }
//!   │
//!   ├─► fire stop (idempotent), drop combined, join mux
//!   ├─► report StopPending
//!   ├─► on_stop() (panic caught)
//!   ├─► wait completion
//!   └─► report Stopped
//! ```
//!
//! ## Rules
//! - Every report is a single bounded attempt; none can abort the sequence.
//! - Once a stop-class request is accepted the sequence always reaches `Stopped`.
//! - A session executes at most once; the stop callback runs at most once.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::{sync::mpsc, time};

use crate::{
    config::Config,
    control::{ControlRequest, Signal, mux},
    core::stop::StopRef,
    error::panic_message,
    events::{Bus, Event, EventKind},
    platform::Service,
    status::{Accepts, ServiceState, Status, StatusReporter},
};

/// Lifecycle state machine driven by a platform dispatcher.
pub(crate) struct Session {
    report_timeout: Duration,
    interrogate_pause: Duration,
    stop: Signal,
    completion: Signal,
    on_stop: StopRef,
    bus: Bus,
    executed: AtomicBool,
}

impl Session {
    pub(crate) fn new(
        cfg: &Config,
        stop: Signal,
        completion: Signal,
        on_stop: StopRef,
        bus: Bus,
    ) -> Self {
        Self {
            report_timeout: cfg.report_timeout,
            interrogate_pause: cfg.interrogate_pause,
            stop,
            completion,
            on_stop,
            bus,
            executed: AtomicBool::new(false),
        }
    }

    /// Consumes the combined stream until a stop-class request arrives.
    async fn serve(
        &self,
        combined: &mut mpsc::Receiver<ControlRequest>,
        reporter: &StatusReporter,
        current: Status,
    ) -> ControlRequest {
        while let Some(req) = combined.recv().await {
            self.bus
                .publish(Event::new(EventKind::ControlReceived).with_code(req.code()));

            match req {
                ControlRequest::Interrogate => {
                    let _ = reporter.report(current).await;
                    time::sleep(self.interrogate_pause).await;
                    let _ = reporter.report(current).await;
                }
                ControlRequest::Stop => {
                    tracing::info!("received stop request from service manager");
                    return req;
                }
                ControlRequest::Shutdown if self.stop.is_fired() => {
                    tracing::info!("stop requested by application");
                    return req;
                }
                ControlRequest::Shutdown => {
                    tracing::info!("received shutdown request from service manager");
                    return req;
                }
                ControlRequest::Other(code) => {
                    tracing::error!(code, "unexpected control request; ignored");
                    self.bus
                        .publish(Event::new(EventKind::ControlIgnored).with_code(code));
                }
            }
        }

        // The multiplexer only closes early if its task died.
        tracing::warn!("control multiplexer closed unexpectedly; stopping");
        ControlRequest::Shutdown
    }

    /// Runs the stop sequence from `StopPending` to `Stopped`.
    async fn shut_down(&self, reporter: &StatusReporter, trigger: ControlRequest) {
        self.bus
            .publish(Event::new(EventKind::StopRequested).with_reason(trigger.as_label()));

        let _ = reporter.report(Status::new(ServiceState::StopPending)).await;
        tracing::info!("service state changed to stop_pending; invoking stop callback");

        self.bus.publish(Event::new(EventKind::StopCallbackInvoked));
        if let Err(panic_err) = AssertUnwindSafe(self.on_stop.on_stop())
            .catch_unwind()
            .await
        {
            let info = panic_message(&*panic_err);
            tracing::warn!(panic = %info, "stop callback panicked");
            self.bus
                .publish(Event::new(EventKind::StopCallbackPanicked).with_reason(info));
        }

        // The dispatcher marks the service stopped once execute returns, so hold
        // here until the host has finished its own teardown.
        self.completion.fired().await;
        self.bus.publish(Event::new(EventKind::ShutdownCompleted));

        let _ = reporter.report(Status::new(ServiceState::Stopped)).await;
        tracing::debug!("service state changed to stopped");
        self.bus.publish(
            Event::new(EventKind::SessionFinished).with_state(ServiceState::Stopped),
        );
    }
}

#[async_trait]
impl Service for Session {
    async fn execute(
        &self,
        requests: mpsc::Receiver<ControlRequest>,
        changes: mpsc::Sender<Status>,
    ) {
        if self.executed.swap(true, Ordering::AcqRel) {
            tracing::warn!("service session already executed; ignoring dispatch");
            return;
        }

        let reporter = StatusReporter::new(changes, self.report_timeout, self.bus.clone());
        let _ = reporter.report(Status::new(ServiceState::StartPending)).await;
        let current = Status::running(Accepts::STOP | Accepts::SHUTDOWN);
        let _ = reporter.report(current).await;

        let (mut combined, mux_task) = mux::spawn(requests, self.stop.clone());
        let trigger = self.serve(&mut combined, &reporter, current).await;

        self.stop.fire();
        drop(combined);
        if let Err(e) = mux_task.await {
            tracing::warn!(error = %e, "control multiplexer task failed");
        }

        self.shut_down(&reporter, trigger).await;
    }
}
