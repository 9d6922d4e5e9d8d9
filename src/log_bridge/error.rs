//! Log bridge error types.

// Layer 1: Standard library imports
use std::io;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::bus::BusError;

/// Errors returned when wiring up a log bridge subscriber.
#[derive(Debug, Error)]
pub enum LogBridgeError {
    /// Subscribing to the bus failed (invalid topic or router not started).
    #[error(transparent)]
    Bus(#[from] BusError),

    /// Opening or preparing the underlying sink failed.
    #[error("failed to open log sink: {0}")]
    Io(#[from] io::Error),
}
