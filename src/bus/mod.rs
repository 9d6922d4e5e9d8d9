//! The topic-routed, asynchronous publish/subscribe event bus.
//!
//! Grounded on the `util/events` package: [`RoutingKey`] and [`Topic`] are
//! the two validated string types publishers and subscribers exchange,
//! [`Event`] is the envelope that carries a routing key and an opaque
//! [`Payload`](crate::util::Payload), and [`EventRouter`] is the
//! dispatcher that matches one against the other. [`Bus`] wraps a router
//! behind a process-wide handle for callers that don't want to thread an
//! `EventRouter` through their own state.

mod config;
mod error;
mod event;
mod facade;
mod registry;
mod router;
mod routing_key;
mod subscription;
mod topic;

pub use config::BusConfig;
pub use error::BusError;
pub use event::Event;
pub use facade::Bus;
pub use router::EventRouter;
pub use routing_key::RoutingKey;
pub use subscription::{Subscription, SubscriptionId};
pub use topic::Topic;
