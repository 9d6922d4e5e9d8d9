//! # eventrt — an in-process event bus and managed-worker runtime
//!
//! A topic-routed, in-memory publish/subscribe event bus with AMQP-style
//! wildcard matching, paired with a reusable managed-worker abstraction
//! that gives any async work function a start/reload/stop lifecycle and
//! typed outbound channels. A log bridge connects the two: application
//! and crate-internal logs flow onto the bus as ordinary events, and
//! companion subscribers drain them to stdout, stderr, or a file.
//!
//! # Quick start
//!
//! ```rust
//! use eventrt::bus::{EventRouter, RoutingKey, Topic};
//! use eventrt::util::Payload;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let router = EventRouter::new();
//! router.start().await;
//!
//! let mut sub = router.subscribe(Topic::new("orders.*").unwrap()).await.unwrap();
//! router
//!     .publish(RoutingKey::new("orders.created").unwrap(), Payload::new(42_u64))
//!     .await
//!     .unwrap();
//!
//! let event = sub.recv().await.unwrap();
//! assert_eq!(event.payload().downcast_ref::<u64>(), Some(&42));
//!
//! router.stop().await;
//! # }
//! ```
//!
//! # Module organization
//!
//! - [`bus`] — [`RoutingKey`](bus::RoutingKey), [`Topic`](bus::Topic),
//!   [`Event`](bus::Event), [`EventRouter`](bus::EventRouter), and the
//!   process-wide [`Bus`](bus::Bus) facade.
//! - [`worker`] — [`ManagedThread`](worker::ManagedThread), its
//!   [`Status`](worker::Status) lifecycle, and the typed
//!   [`Message`](worker::Message)/error channels it exposes.
//! - [`log_bridge`] — [`LogBridgeLayer`](log_bridge::LogBridgeLayer) and
//!   the I/O subscribers that drain log events to a sink.
//! - [`util`] — small primitives ([`Payload`](util::Payload),
//!   [`NamedLock`](util::NamedLock)) shared by the other modules.
//!
//! # Concurrency model
//!
//! The bus has a single dispatcher task per [`EventRouter`](bus::EventRouter);
//! publishers and subscribers never touch the subscriber registry directly.
//! Within one topic, subscribers observe events in the order the dispatcher
//! processed them; across topics, fan-out runs concurrently and ordering is
//! undefined. Every channel send/receive is a suspension point: `publish`
//! can block on a full ingress channel, and dispatch can block on a slow
//! subscriber's full buffer, giving well-defined, if not instantaneous,
//! back-pressure.
//!
//! # Non-goals
//!
//! The bus is purely in-memory and volatile: no durable storage or replay,
//! no cross-process delivery, no guaranteed delivery beyond the bounded
//! per-subscriber buffer, and no strict ordering across distinct topics.

pub mod bus;
pub mod log_bridge;
pub mod util;
pub mod worker;

pub mod prelude;
