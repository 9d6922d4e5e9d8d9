//! The managed-thread state machine.
//!
//! Grounded on `util/thread/thread.go`'s `Status`/`AtomicStatus`. Transitions
//! allowed by [`ManagedThread`](super::thread::ManagedThread):
//! `Init|Stopped -> Starting -> Running`, `Running -> Reloading -> Running`,
//! `Running|Reloading -> Stopping -> Stopped`.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// One state in the managed-thread lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Status {
    Init = 0,
    Starting = 1,
    Running = 2,
    Reloading = 4,
    Stopping = 8,
    Stopped = 16,
}

impl Status {
    fn from_u32(value: u32) -> Self {
        match value {
            1 => Status::Starting,
            2 => Status::Running,
            4 => Status::Reloading,
            8 => Status::Stopping,
            16 => Status::Stopped,
            _ => Status::Init,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Init => "init",
            Status::Starting => "starting",
            Status::Running => "running",
            Status::Reloading => "reloading",
            Status::Stopping => "stopping",
            Status::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// A thread-safe cell holding the current [`Status`].
#[derive(Debug)]
pub(crate) struct AtomicStatus(AtomicU32);

impl AtomicStatus {
    pub(crate) fn new() -> Self {
        Self(AtomicU32::new(Status::Init as u32))
    }

    pub(crate) fn load(&self) -> Status {
        Status::from_u32(self.0.load(Ordering::SeqCst))
    }

    /// Store `status`, returning the previous value.
    pub(crate) fn swap(&self, status: Status) -> Status {
        Status::from_u32(self.0.swap(status as u32, Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StatusChange {
    pub(crate) old: Status,
    pub(crate) new: Status,
}
