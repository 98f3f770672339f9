//! # Example: channel
//!
//! Plays the service manager over in-memory channels: waits for `Running`,
//! interrogates the service, then sends `Stop` and prints every status report.
//!
//! ## Run
//! ```bash
//! cargo run --example channel
//! ```

use svcvisor::{
    ChannelPlatform, Config, ControlRequest, ServiceController, ServiceState, StopFn, StopRef,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (platform, mut remote) = ChannelPlatform::new(8);
    let controller = ServiceController::builder(Config::default())
        .with_platform(platform)
        .build();
    let handle = controller.handle();

    // Teardown here is instant, so completion is reported from the callback itself.
    let on_stop: StopRef = StopFn::arc({
        let handle = handle.clone();
        move || {
            let handle = handle.clone();
            async move {
                println!("[app] stop callback invoked");
                handle.notify_shutdown_complete();
            }
        }
    });
    let service = tokio::spawn(controller.start(on_stop));

    let mut interrogated = false;
    while let Some(status) = remote.changes.recv().await {
        println!("[manager] status {} accepts={:#04b}", status.state, status.accepts.bits());
        if status.state == ServiceState::Running {
            let req = if interrogated {
                ControlRequest::Stop
            } else {
                interrogated = true;
                ControlRequest::Interrogate
            };
            println!("[manager] sending {}", req.as_label());
            // The session stops listening once it honors Stop.
            let _ = remote.requests.send(req).await;
        }
    }

    service.await?;
    println!("[manager] termination: {:?}", handle.wait_for_termination().await);
    Ok(())
}
