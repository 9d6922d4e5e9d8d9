//! The unit of data flowing through the bus.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use super::error::BusError;
use super::routing_key::RoutingKey;
use crate::util::Payload;

/// A published message: a routing key, an opaque payload, and the instant
/// it was constructed.
///
/// Grounded on `util/events/event.go`'s `Event` struct and `NewEvent`.
/// Cheap to clone: the payload is reference-counted, so fanning one event
/// out to many subscribers never copies its contents (see
/// [`Payload`](crate::util::Payload)).
#[derive(Clone)]
pub struct Event {
    routing_key: RoutingKey,
    payload: Payload,
    timestamp: DateTime<Utc>,
}

impl Event {
    /// Construct an event stamped with the current time.
    pub fn new(routing_key: RoutingKey, payload: Payload) -> Self {
        Self {
            routing_key,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Construct an event with an explicit timestamp, for testing or replay.
    pub fn with_timestamp(routing_key: RoutingKey, payload: Payload, timestamp: DateTime<Utc>) -> Self {
        Self {
            routing_key,
            payload,
            timestamp,
        }
    }

    /// The event's routing key.
    pub fn routing_key(&self) -> &RoutingKey {
        &self.routing_key
    }

    /// The event's opaque payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consume the event, returning its payload.
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// The instant the event was constructed.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Validate the event's invariants: a valid routing key, a present
    /// payload, and a timestamp not in the future.
    pub fn is_valid(&self) -> Result<(), BusError> {
        if !RoutingKey::is_valid_str(self.routing_key.as_str()) {
            return Err(BusError::InvalidRoutingKey(self.routing_key.as_str().to_string()));
        }

        if self.payload.is_none() {
            return Err(BusError::NilPayload);
        }

        if self.timestamp > Utc::now() {
            return Err(BusError::TimestampInFuture);
        }

        Ok(())
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("routing_key", &self.routing_key)
            .field("payload", &self.payload)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
