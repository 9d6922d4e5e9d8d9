//! Buffer-size constants for the router's channels.
//!
//! Grounded on `util/events/router.go`'s `EventBufferSize` and
//! `SubscriberBufferSize` constants.

/// Capacity of the router's ingress channel.
pub const EVENT_BUFFER_SIZE: usize = 128;

/// Capacity of each per-subscriber delivery channel.
pub const SUBSCRIBER_BUFFER_SIZE: usize = 64;

/// Tunables for an [`EventRouter`](super::router::EventRouter).
///
/// Not present in the original (its buffer sizes are package constants);
/// added so tests and latency-sensitive callers can size channels without
/// forking the crate, while [`BusConfig::default`] reproduces the
/// original's fixed constants exactly.
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    /// Capacity of the router's ingress channel.
    pub event_buffer_size: usize,
    /// Capacity of each per-subscriber delivery channel.
    pub subscriber_buffer_size: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: EVENT_BUFFER_SIZE,
            subscriber_buffer_size: SUBSCRIBER_BUFFER_SIZE,
        }
    }
}

impl BusConfig {
    /// Override the ingress channel capacity.
    pub fn with_event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    /// Override the per-subscriber channel capacity.
    pub fn with_subscriber_buffer_size(mut self, size: usize) -> Self {
        self.subscriber_buffer_size = size;
        self
    }
}
