//! # Example: console
//!
//! Runs the controller in the foreground. Press Ctrl-C to deliver a `Stop`
//! request; the application then tears down its worker and reports completion.
//!
//! Demonstrates how to:
//! - Attach the [`LogWriter`] subscriber and a `tracing` formatter.
//! - Wire a [`StopFn`] callback into an application cancellation token.
//! - Call [`ServiceHandle::notify_shutdown_complete`] after teardown.
//!
//! ## Flow
//! ```text
//! Ctrl-C ──► Console ──► Stop ──► Session
//!     ├─► StopPending
//!     ├─► on_stop() ──► app token cancelled
//!     │                   └─► worker exits ──► notify_shutdown_complete()
//!     └─► Stopped ──► start() returns
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example console --features logging
//! ```

use std::{sync::Arc, time::Duration};

use svcvisor::{
    Config, Console, LogWriter, ServiceController, ServiceHandle, StopFn, StopRef, Subscribe,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

async fn worker(app: CancellationToken, handle: ServiceHandle) {
    let mut ticks = 0u64;
    loop {
        tokio::select! {
            _ = app.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                ticks += 1;
                tracing::info!(ticks, "working");
            }
        }
    }
    tracing::info!("flushing state");
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.notify_shutdown_complete();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let controller = ServiceController::builder(Config::default())
        .with_platform(Console::default())
        .with_subscribers(subs)
        .build();
    let handle = controller.handle();

    let app = CancellationToken::new();
    let on_stop: StopRef = StopFn::arc({
        let app = app.clone();
        move || {
            let app = app.clone();
            async move { app.cancel() }
        }
    });

    let work = tokio::spawn(worker(app, handle.clone()));
    controller.start(on_stop).await;
    work.await?;

    println!("termination: {:?}", handle.wait_for_termination().await);
    Ok(())
}
