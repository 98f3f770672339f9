//! End-to-end lifecycle scenarios driven through the public API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use svcvisor::{
    Accepts, ChannelPlatform, Config, ControlRequest, Event, EventKind, Platform, PlatformError,
    Service, ServiceController, ServiceHandle, ServiceState, Status, StopFn, StopRef, Subscribe,
    Termination,
};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

/// Stop callback that records each invocation.
fn recording_stop() -> (StopRef, mpsc::UnboundedReceiver<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let on_stop: StopRef = StopFn::arc(move || {
        let tx = tx.clone();
        async move {
            let _ = tx.send(());
        }
    });
    (on_stop, rx)
}

/// Stop callback that finishes teardown immediately.
fn completing_stop(handle: &ServiceHandle) -> (StopRef, mpsc::UnboundedReceiver<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = handle.clone();
    let on_stop: StopRef = StopFn::arc(move || {
        let tx = tx.clone();
        let handle = handle.clone();
        async move {
            let _ = tx.send(());
            handle.notify_shutdown_complete();
        }
    });
    (on_stop, rx)
}

fn controller_over(platform: impl Platform) -> ServiceController {
    ServiceController::builder(Config::default())
        .with_platform(platform)
        .build()
}

async fn collect_states(changes: &mut mpsc::Receiver<Status>) -> Vec<ServiceState> {
    let mut out = Vec::new();
    while let Some(status) = changes.recv().await {
        out.push(status.state);
    }
    out
}

fn count_calls(rx: &mut mpsc::UnboundedReceiver<()>) -> usize {
    let mut n = 0;
    while rx.try_recv().is_ok() {
        n += 1;
    }
    n
}

const FULL_SEQUENCE: [ServiceState; 4] = [
    ServiceState::StartPending,
    ServiceState::Running,
    ServiceState::StopPending,
    ServiceState::Stopped,
];

#[tokio::test(start_paused = true)]
async fn interrogate_then_stop_reports_full_sequence() {
    let (platform, mut remote) = ChannelPlatform::new(16);
    let controller = controller_over(platform);
    let handle = controller.handle();
    let (on_stop, mut stops) = recording_stop();
    let run = tokio::spawn(controller.start(on_stop));

    assert_eq!(
        remote.changes.recv().await,
        Some(Status::new(ServiceState::StartPending))
    );
    let running = Status::running(Accepts::STOP | Accepts::SHUTDOWN);
    assert_eq!(remote.changes.recv().await, Some(running));

    remote.requests.send(ControlRequest::Interrogate).await.unwrap();
    assert_eq!(remote.changes.recv().await, Some(running));
    assert_eq!(remote.changes.recv().await, Some(running));

    remote.requests.send(ControlRequest::Stop).await.unwrap();
    assert_eq!(
        remote.changes.recv().await.map(|s| s.state),
        Some(ServiceState::StopPending)
    );
    stops.recv().await.unwrap();
    assert!(handle.is_stop_requested());

    let stalled = time::timeout(Duration::from_secs(30), remote.changes.recv()).await;
    assert!(stalled.is_err(), "Stopped must wait for notify_shutdown_complete");
    assert!(!handle.is_terminated());

    handle.notify_shutdown_complete();
    assert_eq!(
        remote.changes.recv().await.map(|s| s.state),
        Some(ServiceState::Stopped)
    );
    assert_eq!(remote.changes.recv().await, None);
    run.await.unwrap();

    let started = Instant::now();
    assert_eq!(handle.wait_for_termination().await, Termination::Terminated);
    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(count_calls(&mut stops), 0, "callback must run exactly once");
}

#[tokio::test(start_paused = true)]
async fn request_stop_converges_on_same_sequence() {
    let (platform, mut remote) = ChannelPlatform::new(16);
    let controller = controller_over(platform);
    let handle = controller.handle();
    let (on_stop, mut stops) = recording_stop();
    let run = tokio::spawn(controller.start(on_stop));

    assert_eq!(
        remote.changes.recv().await.map(|s| s.state),
        Some(ServiceState::StartPending)
    );
    assert_eq!(
        remote.changes.recv().await.map(|s| s.state),
        Some(ServiceState::Running)
    );

    handle.request_stop();
    assert_eq!(
        remote.changes.recv().await.map(|s| s.state),
        Some(ServiceState::StopPending)
    );
    stops.recv().await.unwrap();

    handle.notify_shutdown_complete();
    assert_eq!(collect_states(&mut remote.changes).await, vec![ServiceState::Stopped]);
    run.await.unwrap();
    assert_eq!(handle.wait_for_termination().await, Termination::Terminated);
}

#[derive(Debug, Clone, Copy)]
enum Order {
    SignalBeforeStart,
    RequestThenSignal,
    SignalThenRequest,
    ShutdownAndSignal,
}

#[tokio::test(start_paused = true)]
async fn both_triggers_stop_exactly_once() {
    for order in [
        Order::SignalBeforeStart,
        Order::RequestThenSignal,
        Order::SignalThenRequest,
        Order::ShutdownAndSignal,
    ] {
        let (platform, mut remote) = ChannelPlatform::new(16);
        let controller = controller_over(platform);
        let handle = controller.handle();
        let (on_stop, mut stops) = completing_stop(&handle);

        match order {
            Order::SignalBeforeStart => {
                handle.request_stop();
                remote.requests.send(ControlRequest::Stop).await.unwrap();
            }
            Order::RequestThenSignal => {
                remote.requests.send(ControlRequest::Stop).await.unwrap();
                handle.request_stop();
            }
            Order::SignalThenRequest => {
                handle.request_stop();
                handle.request_stop();
                remote.requests.send(ControlRequest::Shutdown).await.unwrap();
            }
            Order::ShutdownAndSignal => {}
        }

        let run = tokio::spawn(controller.start(on_stop));
        if let Order::ShutdownAndSignal = order {
            time::sleep(Duration::from_millis(1)).await;
            remote.requests.send(ControlRequest::Shutdown).await.unwrap();
            handle.request_stop();
            let _ = remote.requests.try_send(ControlRequest::Stop);
        }

        assert_eq!(
            collect_states(&mut remote.changes).await,
            FULL_SEQUENCE.to_vec(),
            "order {order:?}"
        );
        run.await.unwrap();
        assert_eq!(count_calls(&mut stops), 1, "order {order:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn unknown_codes_are_ignored() {
    let (platform, mut remote) = ChannelPlatform::new(16);
    let controller = controller_over(platform);
    let handle = controller.handle();
    let mut events = controller.subscribe();
    let (on_stop, _stops) = completing_stop(&handle);

    remote.requests.send(ControlRequest::Other(77)).await.unwrap();
    remote.requests.send(ControlRequest::from_code(200)).await.unwrap();
    remote.requests.send(ControlRequest::Interrogate).await.unwrap();
    remote.requests.send(ControlRequest::Stop).await.unwrap();
    controller.start(on_stop).await;

    assert_eq!(
        collect_states(&mut remote.changes).await,
        vec![
            ServiceState::StartPending,
            ServiceState::Running,
            ServiceState::Running,
            ServiceState::Running,
            ServiceState::StopPending,
            ServiceState::Stopped,
        ]
    );

    let mut ignored = Vec::new();
    while let Ok(ev) = events.try_recv() {
        if ev.kind == EventKind::ControlIgnored {
            ignored.push(ev.code);
        }
    }
    assert_eq!(ignored, vec![Some(77), Some(200)]);
}

#[tokio::test(start_paused = true)]
async fn completion_notified_early_is_remembered() {
    let (platform, mut remote) = ChannelPlatform::new(16);
    let controller = controller_over(platform);
    let handle = controller.handle();
    let (on_stop, mut stops) = recording_stop();

    handle.notify_shutdown_complete();
    handle.request_stop();
    controller.start(on_stop).await;

    assert_eq!(collect_states(&mut remote.changes).await, FULL_SEQUENCE.to_vec());
    assert_eq!(count_calls(&mut stops), 1);
    assert!(handle.is_terminated());
}

/// Platform whose status sink never accepts a write.
struct StuckSink;

#[async_trait]
impl Platform for StuckSink {
    fn is_interactive(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    fn is_service(&self) -> Result<bool, PlatformError> {
        Ok(true)
    }

    async fn dispatch(&self, _name: &str, service: Arc<dyn Service>) -> Result<(), PlatformError> {
        let (_req_tx, req_rx) = mpsc::channel(1);
        let (status_tx, _held) = mpsc::channel(1);
        status_tx
            .try_send(Status::new(ServiceState::StartPending))
            .map_err(|e| PlatformError::Registration {
                error: e.to_string(),
            })?;
        service.execute(req_rx, status_tx).await;
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn unresponsive_sink_does_not_block_sequence() {
    let controller = controller_over(StuckSink);
    let handle = controller.handle();
    let mut events = controller.subscribe();
    let (on_stop, mut stops) = completing_stop(&handle);

    handle.request_stop();
    let started = Instant::now();
    controller.start(on_stop).await;
    let elapsed = started.elapsed();

    // Four reports, each abandoned after ~500 ms.
    assert!(elapsed >= Duration::from_millis(2000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(2100), "{elapsed:?}");
    assert_eq!(count_calls(&mut stops), 1);

    let mut dropped = Vec::new();
    while let Ok(ev) = events.try_recv() {
        if ev.kind == EventKind::StatusDropped {
            assert_eq!(ev.reason.as_deref(), Some("report_timeout"));
            dropped.extend(ev.state);
        }
    }
    assert_eq!(dropped, FULL_SEQUENCE.to_vec());
    assert_eq!(handle.wait_for_termination().await, Termination::Terminated);
}

#[tokio::test(start_paused = true)]
async fn detached_process_skips_supervision() {
    let controller = ServiceController::builder(Config::default()).build();
    let handle = controller.handle();
    let (on_stop, mut stops) = recording_stop();

    controller.start(on_stop).await;
    assert!(handle.is_terminated());
    assert_eq!(count_calls(&mut stops), 0);

    let started = Instant::now();
    assert_eq!(
        handle
            .wait_for_termination_within(Duration::from_secs(3600))
            .await,
        Termination::Unsupervised
    );
    assert_eq!(started.elapsed(), Duration::ZERO);
}

/// Platform whose queries or registration fail.
struct Failing {
    query_fails: bool,
}

#[async_trait]
impl Platform for Failing {
    fn is_interactive(&self) -> Result<bool, PlatformError> {
        if self.query_fails {
            Err(PlatformError::Query {
                error: "access denied".into(),
            })
        } else {
            Ok(false)
        }
    }

    fn is_service(&self) -> Result<bool, PlatformError> {
        Ok(true)
    }

    async fn dispatch(&self, _name: &str, _service: Arc<dyn Service>) -> Result<(), PlatformError> {
        Err(PlatformError::Registration {
            error: "dispatcher unavailable".into(),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn platform_failures_leave_host_unsupervised() {
    for query_fails in [true, false] {
        let controller = controller_over(Failing { query_fails });
        let handle = controller.handle();
        let (on_stop, mut stops) = recording_stop();

        controller.start(on_stop).await;

        assert!(handle.is_terminated());
        assert_eq!(count_calls(&mut stops), 0);
        assert_eq!(handle.wait_for_termination().await, Termination::Terminated);
    }
}

#[tokio::test(start_paused = true)]
async fn termination_wait_is_bounded_while_running() {
    let (platform, mut remote) = ChannelPlatform::new(16);
    let controller = controller_over(platform);
    let handle = controller.handle();
    let (on_stop, _stops) = completing_stop(&handle);
    let run = tokio::spawn(controller.start(on_stop));

    remote.changes.recv().await.unwrap();
    remote.changes.recv().await.unwrap();

    let started = Instant::now();
    assert_eq!(handle.wait_for_termination().await, Termination::TimedOut);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed < Duration::from_millis(510));

    handle.request_stop();
    run.await.unwrap();
    assert_eq!(handle.wait_for_termination().await, Termination::Terminated);
}

#[tokio::test(start_paused = true)]
async fn interactive_session_runs_on_console() {
    let (platform, mut remote) = ChannelPlatform::new(16);
    let controller = controller_over(platform.with_interactive(true).with_service(false));
    let handle = controller.handle();
    let (on_stop, mut stops) = completing_stop(&handle);
    let run = tokio::spawn(controller.start(on_stop));

    handle.request_stop();
    run.await.unwrap();

    assert_eq!(count_calls(&mut stops), 1);
    assert!(remote.changes.try_recv().is_err(), "console must not use the service channels");
    assert_eq!(handle.wait_for_termination().await, Termination::Unsupervised);
}

#[tokio::test(start_paused = true)]
async fn panicking_callback_still_reaches_stopped() {
    let (platform, mut remote) = ChannelPlatform::new(16);
    let controller = controller_over(platform);
    let handle = controller.handle();
    let mut events = controller.subscribe();
    let on_stop: StopRef = StopFn::arc(|| async {
        panic!("teardown exploded");
    });

    handle.request_stop();
    let run = tokio::spawn(controller.start(on_stop));

    let mut states = Vec::new();
    for _ in 0..3 {
        states.push(remote.changes.recv().await.unwrap().state);
    }
    assert_eq!(states, FULL_SEQUENCE[..3].to_vec());

    handle.notify_shutdown_complete();
    assert_eq!(collect_states(&mut remote.changes).await, vec![ServiceState::Stopped]);
    run.await.unwrap();

    let mut panics = Vec::new();
    while let Ok(ev) = events.try_recv() {
        if ev.kind == EventKind::StopCallbackPanicked {
            panics.extend(ev.reason);
        }
    }
    assert_eq!(panics.len(), 1);
    assert_eq!(&*panics[0], "teardown exploded");
}

#[derive(Default)]
struct Recorder {
    kinds: Mutex<Vec<EventKind>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        if let Ok(mut kinds) = self.kinds.lock() {
            kinds.push(event.kind);
        }
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_stop_sequence_in_order() {
    let (platform, _remote) = ChannelPlatform::new(16);
    let recorder = Arc::new(Recorder::default());
    let controller = ServiceController::builder(Config::default())
        .with_platform(platform)
        .with_subscribers(vec![recorder.clone() as Arc<dyn Subscribe>])
        .build();
    let handle = controller.handle();
    let (on_stop, _stops) = completing_stop(&handle);

    handle.request_stop();
    controller.start(on_stop).await;

    let kinds = recorder.kinds.lock().unwrap().clone();
    let sequence: Vec<EventKind> = kinds
        .into_iter()
        .filter(|k| {
            matches!(
                k,
                EventKind::StopRequested
                    | EventKind::StopCallbackInvoked
                    | EventKind::ShutdownCompleted
                    | EventKind::SessionFinished
            )
        })
        .collect();
    assert_eq!(
        sequence,
        vec![
            EventKind::StopRequested,
            EventKind::StopCallbackInvoked,
            EventKind::ShutdownCompleted,
            EventKind::SessionFinished,
        ]
    );
}

/// Subscriber that never finishes handling its first event.
struct Stalled;

#[async_trait]
impl Subscribe for Stalled {
    async fn on_event(&self, _event: &Event) {
        std::future::pending::<()>().await;
    }

    fn name(&self) -> &'static str {
        "stalled"
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_subscriber_does_not_hold_up_exit() {
    let (platform, mut remote) = ChannelPlatform::new(16);
    let controller = ServiceController::builder(Config::default())
        .with_platform(platform)
        .with_subscribers(vec![Arc::new(Stalled) as Arc<dyn Subscribe>])
        .build();
    let handle = controller.handle();
    let (on_stop, mut stops) = recording_stop();

    handle.request_stop();
    handle.notify_shutdown_complete();
    let started = Instant::now();
    let run = tokio::spawn(controller.start(on_stop));

    assert_eq!(collect_states(&mut remote.changes).await, FULL_SEQUENCE.to_vec());
    assert_eq!(handle.wait_for_termination().await, Termination::Terminated);

    let finished = time::timeout(Duration::from_secs(3600), run).await;
    assert!(finished.is_ok(), "start must return despite a stalled subscriber");
    assert!(started.elapsed() < Duration::from_millis(600), "{:?}", started.elapsed());
    assert_eq!(count_calls(&mut stops), 1);
}
