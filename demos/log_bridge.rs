//! Bridging `tracing` logs onto the event bus and draining them back out
//! through the stdout/stderr split subscriber.
//!
//! Run with: `cargo run --example log_bridge`

use std::sync::Arc;
use std::time::Duration;

use eventrt::bus::EventRouter;
use eventrt::log_bridge::{split_stdout_stderr_log_subscriber, LogBridgeLayer};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() {
    let router = Arc::new(EventRouter::new());
    router.start().await;

    split_stdout_stderr_log_subscriber(Arc::clone(&router))
        .await
        .expect("split log subscribers installed");

    let layer = LogBridgeLayer::new(Arc::clone(&router));
    tracing_subscriber::registry().with(layer).init();

    tracing::info!("service starting up");
    tracing::warn!(retry_count = 3, "connection degraded");
    tracing::error!("connection lost");

    // Give the background forwarding task and the IO subscribers a moment
    // to drain before the router (and the process) goes away.
    tokio::time::sleep(Duration::from_millis(50)).await;

    router.stop().await;
}
