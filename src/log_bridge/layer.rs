//! A `tracing_subscriber::Layer` that republishes every log record as a
//! bus [`Event`](crate::bus::Event).
//!
//! Grounded on `modules/EventBus/logger.go`'s `loggerCore`, a `zapcore.Core`
//! that encodes each entry and calls the package-level `Publish`. A
//! `tracing_subscriber::Layer::on_event` hook is synchronous and runs on
//! whatever thread emitted the log line, so it cannot `.await` a publish
//! directly without blocking that thread on bus back-pressure; instead the
//! layer owns a bounded channel drained by a background task that performs
//! the actual `publish`, and `on_event` does a non-blocking `try_send` so a
//! log call can never recursively block on the bus.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::sync::mpsc;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

// Layer 3: Internal module imports
use super::constants::ROUTING_KEY_BASE;
use super::record::LogRecord;
use crate::bus::{EventRouter, RoutingKey};
use crate::util::Payload;

/// Capacity of the layer's internal forwarding channel. Log lines produced
/// faster than the background task can publish them are dropped, mirroring
/// the bus's own bounded-buffer delivery guarantee.
const LAYER_CHANNEL_SIZE: usize = 1024;

/// A [`Layer`] that turns every `tracing` event into a published log [`Event`](crate::bus::Event).
///
/// Install alongside (or instead of) a formatting layer:
///
/// ```rust,ignore
/// use tracing_subscriber::prelude::*;
/// use eventrt::bus::EventRouter;
/// use eventrt::log_bridge::LogBridgeLayer;
///
/// let router = std::sync::Arc::new(EventRouter::new());
/// router.start().await;
/// tracing_subscriber::registry()
///     .with(LogBridgeLayer::new(router))
///     .init();
/// ```
pub struct LogBridgeLayer {
    tx: mpsc::Sender<(RoutingKey, Payload)>,
}

impl LogBridgeLayer {
    /// Build a layer that publishes onto `router`, spawning the background
    /// forwarding task on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime context, since the
    /// forwarding task must be spawned somewhere.
    pub fn new(router: Arc<EventRouter>) -> Self {
        let (tx, mut rx) = mpsc::channel::<(RoutingKey, Payload)>(LAYER_CHANNEL_SIZE);

        tokio::spawn(async move {
            while let Some((routing_key, payload)) = rx.recv().await {
                let _ = router.publish(routing_key, payload).await;
            }
        });

        Self { tx }
    }
}

impl<S> Layer<S> for LogBridgeLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = *metadata.level();

        let mut routing_key = format!("{ROUTING_KEY_BASE}{}", level.as_str().to_lowercase());
        if let Some(span) = ctx.event_span(event) {
            routing_key.push_str(".app.");
            routing_key.push_str(&span.name().replace('.', "-"));
        }

        let Ok(routing_key) = RoutingKey::new(routing_key) else {
            return;
        };

        let record = LogRecord::from_event(level, metadata.target(), event);
        let _ = self.tx.try_send((routing_key, Payload::new(record)));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bus::Topic;
    use tracing_subscriber::prelude::*;

    #[tokio::test]
    async fn emitting_a_log_publishes_a_matching_event() {
        let router = Arc::new(EventRouter::new());
        router.start().await;

        let mut sub = router.subscribe(Topic::new("type.log.level.*").unwrap()).await.unwrap();

        let layer = LogBridgeLayer::new(Arc::clone(&router));
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("hello from the bridge");
        });

        let event = sub.recv().await.unwrap();
        assert_eq!(event.routing_key().as_str(), "type.log.level.info");

        let record = event.payload().downcast_ref::<LogRecord>().unwrap();
        let line = String::from_utf8_lossy(&record.0);
        assert!(line.contains("hello from the bridge"));

        router.stop().await;
    }
}
