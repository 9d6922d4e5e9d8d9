//! The log-to-event bridge: a `tracing_subscriber::Layer` that republishes
//! log records as bus events, plus I/O subscribers that drain them to
//! output sinks.
//!
//! Grounded on `modules/EventBus/logger.go`. A log record is published
//! under `type.log.level.<level>[.app.<name>]` ([`LogBridgeLayer`]);
//! companion subscribers ([`io_log_subscriber`] and its convenience
//! constructors) drain one of the level topics to a byte sink, tolerating
//! short writes and reporting failures back onto the bus rather than
//! recursing into the logger.

mod constants;
mod error;
mod io_subscriber;
mod layer;
mod record;

pub use constants::{
    ALL_LOGS_TOPIC, DEBUG_LOGS_TOPIC, ERROR_LOGS_TOPIC, INFO_LOGS_TOPIC, ROUTING_KEY_BASE, WARN_LOGS_TOPIC,
};
pub use error::LogBridgeError;
pub use io_subscriber::{
    file_log_subscriber, io_log_subscriber, split_stdout_stderr_log_subscriber, stderr_log_subscriber,
    stdout_log_subscriber,
};
pub use layer::LogBridgeLayer;
pub use record::LogRecord;
