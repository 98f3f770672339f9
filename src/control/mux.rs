//! # Control event multiplexer.
//!
//! Merges the service manager's request channel and the stop [`Signal`] into the
//! single stream consumed by the session loop.
//!
//! ```text
//! requests ──┐
//!            ├──► mux task ──► combined (capacity 1) ──► Session loop
//! stop ──────┘
//!
//! loop {
//!   select (stop first) {
//!     stop fired       → send Shutdown, exit
//!     combined dropped → exit
//!     request          → forward verbatim
//!     requests closed  → keep waiting on stop only
//!   }
//! }
//! ```
//!
//! ## Rules
//! - At most one `Shutdown` is synthesized, after which the task exits.
//! - Exhausting the request channel never produces a stop on its own.
//! - A forward blocked on a full combined channel still yields to the stop signal.

use tokio::{sync::mpsc, task::JoinHandle};

use crate::control::{ControlRequest, Signal};

/// Spawns the multiplexer task and returns the combined stream and its handle.
pub(crate) fn spawn(
    requests: mpsc::Receiver<ControlRequest>,
    stop: Signal,
) -> (mpsc::Receiver<ControlRequest>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(run(requests, stop, tx));
    (rx, handle)
}

async fn run(
    mut requests: mpsc::Receiver<ControlRequest>,
    stop: Signal,
    out: mpsc::Sender<ControlRequest>,
) {
    let mut inbound_open = true;
    loop {
        tokio::select! {
            biased;
            _ = stop.fired() => {
                let _ = out.send(ControlRequest::Shutdown).await;
                return;
            }
            _ = out.closed() => return,
            req = requests.recv(), if inbound_open => match req {
                Some(req) => {
                    if !forward(&out, &stop, req).await {
                        return;
                    }
                }
                None => {
                    tracing::debug!("control request channel closed; waiting for stop signal");
                    inbound_open = false;
                }
            },
        }
    }
}

/// Forwards `req`, returning `false` when the task should exit.
async fn forward(out: &mpsc::Sender<ControlRequest>, stop: &Signal, req: ControlRequest) -> bool {
    tokio::select! {
        biased;
        _ = stop.fired() => {
            let _ = out.send(ControlRequest::Shutdown).await;
            false
        }
        sent = out.send(req) => sent.is_ok(),
    }
}
