//! End-to-end test wiring a `tracing` emitter through the log bridge layer,
//! the bus, and an I/O subscriber draining to a byte sink.

#![allow(clippy::unwrap_used)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eventrt::bus::EventRouter;
use eventrt::log_bridge::{io_log_subscriber, LogBridgeLayer};
use eventrt::util::Payload;
use tracing_subscriber::prelude::*;

#[derive(Clone, Default)]
struct VecSink(Arc<Mutex<Vec<u8>>>);

impl Write for VecSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn tracing_events_flow_through_the_bus_to_an_io_sink() {
    let router = Arc::new(EventRouter::new());
    router.start().await;

    let sink = VecSink::default();
    io_log_subscriber(Arc::clone(&router), eventrt::bus::Topic::new("type.log.level.warn").unwrap(), sink.clone())
        .await
        .unwrap();

    let layer = LogBridgeLayer::new(Arc::clone(&router));
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(retry_count = 3, "connection degraded");
    });

    // Give the layer's forwarding task and the I/O processor a moment to
    // drain before inspecting the sink.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let written = sink.0.lock().unwrap_or_else(|e| e.into_inner()).clone();
    let line = String::from_utf8_lossy(&written);
    assert!(line.contains("WARN"));
    assert!(line.contains("connection degraded"));
    assert!(line.contains("retry_count=3"));

    router.stop().await;
}

#[tokio::test]
async fn bus_publish_and_payload_round_trip_through_unwrap_event() {
    use eventrt::bus::{Bus, Event, RoutingKey};

    let event = Event::new(RoutingKey::new("foo.bar").unwrap(), Payload::new(99_u32));
    let value: u32 = Bus::unwrap_event(event).unwrap();
    assert_eq!(value, 99);

    Bus::stop().await;
}
