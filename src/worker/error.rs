//! Managed-thread error types.
//!
//! Error text is reproduced verbatim from `util/thread/thread.go`'s
//! `Start`/`Stop`/`Reload` validation errors.

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use super::status::Status;

/// Errors returned by [`ManagedThread`](super::thread::ManagedThread) lifecycle operations.
#[derive(Debug, Error)]
pub enum ThreadError {
    /// `reload()` called while not in [`Status::Running`].
    #[error("cannot reload when thread status is: {0}")]
    CannotReload(Status),

    /// `start()` called while not in [`Status::Init`] or [`Status::Stopped`].
    #[error("cannot start when thread status is {0}")]
    CannotStart(Status),

    /// `stop()` called while not in [`Status::Running`] or [`Status::Reloading`].
    #[error("cannot stop when thread status is: {0}")]
    CannotStop(Status),

    /// The internal status-change channel closed unexpectedly while
    /// `stop()` was waiting out a reload.
    #[error("thread failed to stop and is unrecoverable. reason: unknown")]
    StopUnrecoverable,

    /// The thread left [`Status::Reloading`] for something other than
    /// [`Status::Running`] while `stop()` was waiting for the reload to
    /// finish.
    #[error("thread failed to stop while waiting for reload. status changed: {old} --> {new}")]
    StopDuringReload { old: Status, new: Status },

    /// The status-change channel closed while the supervisor task was
    /// running; the worker may still be executing with no way to signal it.
    #[error("aborting thread. unrecoverable")]
    Aborted,
}
