//! Per-key mutual exclusion over an unbounded set of string keys.
//!
//! Grounded on `util/sync/namedLock.go` in the original implementation: a
//! `sync.Map` of per-name mutexes, lazily created on first use. The Rust
//! rendition swaps the lazily-created `sync.Mutex` for a lazily-created
//! `tokio::sync::Mutex` behind an `Arc`, so callers can hold the guard
//! across `.await` points (needed to serialize a topic's subscribe/
//! unsubscribe edits while the registry's reader/writer lock is also in
//! play), and the backing map for a lock-free `dashmap::DashMap` to match
//! the rest of this crate's registry/router primitives.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of independently lockable names.
///
/// Two calls to [`NamedLock::lock`] with different names never contend;
/// two calls with the same name serialize. Locks are created on first use
/// and never removed automatically — call [`NamedLock::remove`] once a
/// name is known to be permanently retired (e.g. a topic's last
/// subscriber unsubscribed) to bound memory growth.
#[derive(Debug, Default)]
pub struct NamedLock {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl NamedLock {
    /// Create an empty named lock map.
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the mutex for `name`, creating it if this is the first use.
    ///
    /// Returns an owned guard so it can be held across `.await` points and
    /// returned from a function.
    pub async fn lock(&self, name: &str) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        mutex.lock_owned().await
    }

    /// Drop the entry for `name`, allowing its memory to be reclaimed.
    ///
    /// Safe to call even while another task holds a guard for `name`: the
    /// `Arc` keeps the mutex alive until that guard is dropped, and the
    /// next `lock()` call simply creates a fresh entry.
    pub fn remove(&self, name: &str) {
        self.locks.remove(name);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_name_serializes() {
        let lock = Arc::new(NamedLock::new());
        let counter = Arc::new(AtomicU32::new(0));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let lock = lock.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                let _guard = lock.lock("topic.a").await;
                let before = counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                assert_eq!(counter.load(Ordering::SeqCst), before + 1);
            }));
        }

        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn different_names_do_not_block_each_other() {
        let lock = NamedLock::new();
        let _a = lock.lock("topic.a").await;
        // A different name should acquire immediately even while "topic.a" is held.
        let fut = lock.lock("topic.b");
        let result = tokio::time::timeout(Duration::from_millis(50), fut).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn remove_does_not_affect_held_guard() {
        let lock = Arc::new(NamedLock::new());
        let guard = lock.lock("topic.a").await;
        lock.remove("topic.a");
        drop(guard);

        // Should be able to lock again without issue.
        let _guard2 = lock.lock("topic.a").await;
    }
}
