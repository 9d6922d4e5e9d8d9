//! A generic, supervised worker task with explicit start/stop/reload
//! lifecycle control and typed outbound channels.
//!
//! Grounded on the `util/thread` package: [`ManagedThread`] wraps a
//! user-supplied work function with a [`Status`] state machine, a typed
//! message channel, and a dedicated error channel, all driven by four
//! cooperating tasks spawned on `start()`.

mod config;
mod error;
mod message;
mod status;
mod thread;

pub use config::{ThreadConfig, MIN_MESSAGE_BUFFER_SIZE};
pub use error::ThreadError;
pub use message::Message;
pub use status::Status;
pub use thread::{ControlSignal, ManagedThread};
