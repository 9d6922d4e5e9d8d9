//! Small shared primitives used by both the bus and the worker modules.

pub mod named_lock;
pub mod payload;

pub use named_lock::NamedLock;
pub use payload::Payload;
