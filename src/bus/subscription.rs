//! A live subscription handle returned by [`EventRouter::subscribe`](super::router::EventRouter::subscribe).

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use tokio::sync::mpsc;
use uuid::Uuid;

// Layer 3: Internal module imports
use super::event::Event;
use super::topic::Topic;

/// Identifies one subscription within the registry.
///
/// The original implementation keys a subscriber entry by Go channel
/// identity (`RoutingPair.Subscriber == subscription`), which has no
/// direct Rust equivalent since `mpsc::Sender` doesn't support pointer
/// equality. We mint a `SubscriptionId` at subscribe time instead, and use
/// it as the removal key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A handle to a live subscription: the receiving half of a per-subscriber
/// bounded channel, plus the identity needed to unsubscribe.
///
/// Grounded on `util/events/router.go`'s `RoutingPair`/`Subscriber`, split
/// here into the sender half kept by the registry and this receiver half
/// returned to the caller.
pub struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    receiver: mpsc::Receiver<Event>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, topic: Topic, receiver: mpsc::Receiver<Event>) -> Self {
        Self { id, topic, receiver }
    }

    /// The identity to pass to [`EventRouter::unsubscribe`](super::router::EventRouter::unsubscribe).
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The topic this subscription was registered under.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Await the next matching event, or `None` once the subscription has
    /// been removed and drained.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish()
    }
}
