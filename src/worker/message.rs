//! The element type sent over a managed thread's output channel.

// Layer 3: Internal module imports
use super::error::ThreadError;

/// A value produced by a work function, paired with an optional error.
///
/// Grounded on `util/thread/thread.go`'s `Message[T]{Err error, Msg T}`.
#[derive(Debug)]
pub struct Message<T> {
    value: T,
    error: Option<ThreadError>,
}

impl<T> Message<T> {
    /// Construct a message, optionally carrying an error alongside its value.
    pub fn new(value: T, error: Option<ThreadError>) -> Self {
        Self { value, error }
    }

    /// The carried value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the message, returning its value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// The error carried alongside the value, if any.
    pub fn error(&self) -> Option<&ThreadError> {
        self.error.as_ref()
    }
}
