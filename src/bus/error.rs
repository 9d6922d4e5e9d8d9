//! Bus error types.
//!
//! Error text here is stable, public API surface and is reproduced
//! verbatim from `util/events/event.go` and `util/events/router.go`,
//! including the original's inconsistent spacing in the two
//! publish-after-stop messages.

// Layer 2: Third-party crate imports
use thiserror::Error;

/// Errors returned by [`crate::bus::Topic`], [`crate::bus::Event`],
/// [`crate::bus::EventRouter`] and [`crate::bus::Bus`] operations.
#[derive(Debug, Error)]
pub enum BusError {
    /// A topic string failed grammar validation.
    #[error("invalid topic")]
    InvalidTopic,

    /// A routing key string failed grammar validation.
    #[error("invalid routing key: {0}")]
    InvalidRoutingKey(String),

    /// The event's payload was absent.
    #[error("Event.Msg cannot be a nil pointer")]
    NilPayload,

    /// The event's timestamp was in the future relative to construction time.
    #[error("Event.Timestamp cannot be in the future")]
    TimestampInFuture,

    /// `subscribe`/`unsubscribe`/`publish` called before `start()`.
    #[error("event router not started")]
    NotStarted,

    /// `publish` called on a router that was never started.
    #[error("cannot publish event.  event router not started")]
    PublishNotStarted,

    /// `publish` called on a router that has since been stopped.
    #[error("cannot publish event. event router stopped")]
    PublishStopped,

    /// A payload failed to narrow to the requested concrete type.
    #[error("cannot unwrap event payload as {expected}: payload is {actual}")]
    TypeMismatch {
        /// The type the caller requested.
        expected: &'static str,
        /// The type actually carried by the payload (or `<none>`).
        actual: &'static str,
    },
}
