//! A process-wide event bus handle, for callers that don't want to thread
//! an [`EventRouter`] through their own state.
//!
//! Grounded on `modules/EventBus/eventBus.go`'s package-level `eventRouter`
//! and `New`/`Publish`/`Subscribe`/`Unsubscribe`/`Stop` functions. Unlike a
//! plain `OnceLock`, the singleton here is held behind a `tokio::sync::Mutex`
//! so that [`Bus::stop`] can tear it down and a later [`Bus::global`] call
//! re-creates it, with the lock held across both operations' `.await`
//! points to rule out a re-initialization race.

// Layer 1: Standard library imports
use std::any::Any;
use std::sync::{Arc, LazyLock};

// Layer 2: Third-party crate imports
use tokio::sync::Mutex;

// Layer 3: Internal module imports
use super::error::BusError;
use super::event::Event;
use super::router::EventRouter;
use super::routing_key::RoutingKey;
use super::subscription::{Subscription, SubscriptionId};
use super::topic::Topic;
use crate::util::Payload;

static BUS: LazyLock<Mutex<Option<Arc<EventRouter>>>> = LazyLock::new(|| Mutex::new(None));

/// A handle onto the process-wide [`EventRouter`], lazily created and
/// started on first use.
///
/// `Bus::global()` is idempotent: the underlying router is created once
/// per process (or once since the last [`Bus::stop`]) and every call
/// returns a handle onto the same instance. Prefer constructing your own
/// [`EventRouter`] when you need more than one independently-lifecycled
/// bus (e.g. in tests).
pub struct Bus;

impl Bus {
    /// Borrow the process-wide router, creating and starting it on first
    /// access (or on first access after [`Bus::stop`]).
    pub async fn global() -> Arc<EventRouter> {
        let mut slot = BUS.lock().await;
        if let Some(router) = slot.as_ref() {
            return Arc::clone(router);
        }

        let router = Arc::new(EventRouter::new());
        router.start().await;
        *slot = Some(Arc::clone(&router));
        router
    }

    /// Construct and publish an event on the global router.
    pub async fn publish(routing_key: RoutingKey, payload: Payload) -> Result<(), BusError> {
        Self::global().await.publish(routing_key, payload).await
    }

    /// Publish a fully-constructed event on the global router.
    pub async fn publish_event(event: Event) -> Result<(), BusError> {
        Self::global().await.publish_event(event).await
    }

    /// Subscribe to a topic on the global router.
    pub async fn subscribe(topic: Topic) -> Result<Subscription, BusError> {
        Self::global().await.subscribe(topic).await
    }

    /// Remove a subscription from the global router.
    pub async fn unsubscribe(topic: &Topic, id: SubscriptionId) -> Result<(), BusError> {
        Self::global().await.unsubscribe(topic, id).await
    }

    /// Narrow an event's opaque payload to a concrete type.
    ///
    /// Fails with [`BusError::TypeMismatch`] if the payload is absent or
    /// holds a different concrete type than `T`.
    pub fn unwrap_event<T: Any + Send + Sync>(event: Event) -> Result<T, BusError> {
        let expected = std::any::type_name::<T>();
        event.into_payload().downcast::<T>().map_err(|payload| BusError::TypeMismatch {
            expected,
            actual: payload.type_name(),
        })
    }

    /// Stop the process-wide router, closing every open subscription.
    ///
    /// A later [`Bus::global`] (or `publish`/`subscribe`) call creates and
    /// starts a fresh router. A no-op if the bus was never started.
    pub async fn stop() {
        let mut slot = BUS.lock().await;
        if let Some(router) = slot.take() {
            router.stop().await;
        }
    }
}
