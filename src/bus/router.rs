//! The event router: the dispatcher loop behind the [`Bus`](super::facade::Bus) facade.
//!
//! Grounded on `util/events/router.go`'s `EventRouter`. The original
//! signals its own readiness with a `sync.WaitGroup` and stops by closing
//! both its `stop` and `eventChan` channels together; we use a
//! [`tokio::sync::oneshot`] for start-readiness and a
//! [`tokio::sync::watch<bool>`] for the stop signal, since closing the
//! ingress sender out from under a concurrent `publish` call would
//! otherwise race a send against a closed channel.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

// Layer 3: Internal module imports
use super::config::BusConfig;
use super::error::BusError;
use super::event::Event;
use super::registry::{Registry, RoutingPair};
use super::routing_key::RoutingKey;
use super::subscription::{Subscription, SubscriptionId};
use super::topic::Topic;

struct RouterState {
    ingress_tx: mpsc::Sender<Event>,
    stop_tx: watch::Sender<bool>,
    stop_rx: watch::Receiver<bool>,
    dispatcher: JoinHandle<()>,
}

/// Routes published events to every subscription whose topic matches the
/// event's routing key.
///
/// Mirrors `EventRouter`'s contract: `subscribe`/`unsubscribe`/`publish`
/// all fail with [`BusError::NotStarted`]-family errors before `start()`
/// and after `stop()`; `start()`/`stop()` are idempotent no-ops when
/// already in the target state.
pub struct EventRouter {
    registry: Arc<Registry>,
    state: RwLock<Option<RouterState>>,
    config: BusConfig,
}

impl EventRouter {
    /// Construct a router with default buffer sizes.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Construct a router with the given buffer sizes.
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            registry: Arc::new(Registry::new(config)),
            state: RwLock::new(None),
            config,
        }
    }

    /// Start the dispatcher loop. A no-op if already started.
    pub async fn start(&self) {
        if self.state.read().is_some() {
            return;
        }

        let (ingress_tx, ingress_rx) = mpsc::channel(self.config.event_buffer_size);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (started_tx, started_rx) = oneshot::channel();
        let registry = Arc::clone(&self.registry);
        let dispatcher_stop_rx = stop_rx.clone();

        let dispatcher = tokio::spawn(dispatch_loop(registry, ingress_rx, dispatcher_stop_rx, started_tx));

        {
            let mut state = self.state.write();
            if state.is_some() {
                dispatcher.abort();
                return;
            }
            *state = Some(RouterState {
                ingress_tx,
                stop_tx,
                stop_rx,
                dispatcher,
            });
        }

        let _ = started_rx.await;
        debug!("event router started");
    }

    /// Stop the dispatcher loop and drop every subscriber. A no-op if
    /// already stopped.
    pub async fn stop(&self) {
        let state = self.state.write().take();
        let Some(state) = state else {
            return;
        };

        let _ = state.stop_tx.send(true);
        drop(state.ingress_tx);

        if let Err(err) = state.dispatcher.await {
            warn!(%err, "event router dispatcher task failed to join cleanly");
        }

        self.registry.clear();
        debug!("event router stopped");
    }

    /// Register a new subscription for `topic`.
    pub async fn subscribe(&self, topic: Topic) -> Result<Subscription, BusError> {
        if self.state.read().is_none() {
            return Err(BusError::NotStarted);
        }

        Ok(self.registry.subscribe(topic).await)
    }

    /// Remove a previously-registered subscription.
    pub async fn unsubscribe(&self, topic: &Topic, id: SubscriptionId) -> Result<(), BusError> {
        if self.state.read().is_none() {
            return Err(BusError::NotStarted);
        }

        self.registry.unsubscribe(topic, id).await;
        Ok(())
    }

    /// Construct and publish an event in one call.
    pub async fn publish(&self, routing_key: RoutingKey, payload: crate::util::Payload) -> Result<(), BusError> {
        self.publish_event(Event::new(routing_key, payload)).await
    }

    /// Publish a fully-constructed event.
    pub async fn publish_event(&self, event: Event) -> Result<(), BusError> {
        event.is_valid()?;

        let (ingress_tx, mut stop_rx) = {
            let state = self.state.read();
            match state.as_ref() {
                Some(s) => (s.ingress_tx.clone(), s.stop_rx.clone()),
                None => return Err(BusError::PublishNotStarted),
            }
        };

        if *stop_rx.borrow() {
            return Err(BusError::PublishStopped);
        }

        tokio::select! {
            biased;
            _ = stop_rx.changed() => Err(BusError::PublishStopped),
            res = ingress_tx.send(event) => res.map_err(|_| BusError::PublishStopped),
        }
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

async fn dispatch_loop(
    registry: Arc<Registry>,
    mut ingress_rx: mpsc::Receiver<Event>,
    mut stop_rx: watch::Receiver<bool>,
    started: oneshot::Sender<()>,
) {
    let _ = started.send(());

    loop {
        tokio::select! {
            biased;
            event = ingress_rx.recv() => {
                match event {
                    Some(event) => dispatch_event(&registry, event).await,
                    None => break,
                }
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    // Stop requested: drain whatever is already buffered in
                    // the ingress channel before exiting, rather than
                    // dropping it on the floor.
                    while let Some(event) = ingress_rx.recv().await {
                        dispatch_event(&registry, event).await;
                    }
                    break;
                }
            }
        }
    }

    trace!("event router dispatch loop exited");
}

async fn dispatch_event(registry: &Registry, event: Event) {
    let topic_buckets = registry.matching(event.routing_key());
    if topic_buckets.is_empty() {
        return;
    }

    let mut handles = Vec::with_capacity(topic_buckets.len());
    for subscribers in topic_buckets {
        let event = event.clone();
        handles.push(tokio::spawn(deliver(subscribers, event)));
    }

    for handle in handles {
        if let Err(err) = handle.await {
            warn!(%err, "a topic's delivery task panicked; other subscribers were unaffected");
        }
    }
}

async fn deliver(subscribers: Vec<RoutingPair>, event: Event) {
    for pair in subscribers {
        if pair.sender.send(event.clone()).await.is_err() {
            trace!(subscription = %pair.id, "dropping event for a subscriber that has gone away");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_before_start_fails() {
        let router = EventRouter::new();
        let err = router
            .publish(RoutingKey::new("foo").unwrap(), crate::util::Payload::new(1_u32))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot publish event.  event router not started");
    }

    #[tokio::test]
    async fn subscribe_before_start_fails() {
        let router = EventRouter::new();
        let err = router.subscribe(Topic::new("*").unwrap()).await.unwrap_err();
        assert_eq!(err.to_string(), "event router not started");
    }

    #[tokio::test]
    async fn basic_fan_out_delivers_to_matching_subscriber() {
        let router = EventRouter::new();
        router.start().await;

        let mut sub = router.subscribe(Topic::new("foo.#").unwrap()).await.unwrap();

        router
            .publish(RoutingKey::new("foo.bar").unwrap(), crate::util::Payload::new(7_u32))
            .await
            .unwrap();

        let received = sub.recv().await.unwrap();
        assert_eq!(received.payload().downcast_ref::<u32>(), Some(&7));

        router.stop().await;
    }

    #[tokio::test]
    async fn non_matching_subscriber_receives_nothing() {
        let router = EventRouter::new();
        router.start().await;

        let mut sub = router.subscribe(Topic::new("other").unwrap()).await.unwrap();

        router
            .publish(RoutingKey::new("foo.bar").unwrap(), crate::util::Payload::new(7_u32))
            .await
            .unwrap();

        router.stop().await;
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn publish_after_stop_fails() {
        let router = EventRouter::new();
        router.start().await;
        router.stop().await;

        let err = router
            .publish(RoutingKey::new("foo").unwrap(), crate::util::Payload::new(1_u32))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot publish event.  event router not started");
    }

    #[tokio::test]
    async fn stop_drains_events_still_buffered_in_ingress() {
        let router = EventRouter::new();
        router.start().await;

        let mut sub = router.subscribe(Topic::new("*").unwrap()).await.unwrap();

        for i in 0..10_u32 {
            router
                .publish(RoutingKey::new("foo.bar").unwrap(), crate::util::Payload::new(i))
                .await
                .unwrap();
        }

        // Stop immediately, without first draining the subscriber: any
        // events still sitting in the ingress channel must be dispatched
        // before the dispatcher exits, not dropped.
        router.stop().await;

        let mut received = Vec::new();
        while let Some(event) = sub.recv().await {
            received.push(event.payload().downcast_ref::<u32>().copied().unwrap());
        }
        assert_eq!(received, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let router = EventRouter::new();
        router.start().await;
        router.start().await;
        router.stop().await;
    }
}
