//! Convenient re-exports for consumers of this crate.
//!
//! ```rust
//! use eventrt::prelude::*;
//! ```

// Bus
pub use crate::bus::{Bus, BusConfig, BusError, Event, EventRouter, RoutingKey, Subscription, SubscriptionId, Topic};

// Managed worker
pub use crate::worker::{ControlSignal, ManagedThread, Message, Status, ThreadConfig, ThreadError};

// Log bridge
pub use crate::log_bridge::{
    io_log_subscriber, split_stdout_stderr_log_subscriber, LogBridgeError, LogBridgeLayer, LogRecord,
};

// Utilities
pub use crate::util::{NamedLock, Payload};
