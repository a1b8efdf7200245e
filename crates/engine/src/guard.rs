// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! At most one guarded run per target.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use pf_core::Target;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Per-target async locks, keyed by [`Target::key`].
///
/// A target's entry lives only while someone holds or waits for it.
#[derive(Clone, Default)]
pub struct TargetGuard {
    locks: LockMap,
}

/// Exclusive hold on one target; released on drop.
pub struct TargetLease {
    held: Option<OwnedMutexGuard<()>>,
    key: String,
    locks: LockMap,
}

impl Drop for TargetLease {
    fn drop(&mut self) {
        drop(self.held.take());
        let mut locks = self.locks.lock();
        // Only the map's own reference left: nobody holds or waits.
        if locks.get(&self.key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.key);
        }
    }
}

impl TargetGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, key: &str) -> Arc<AsyncMutex<()>> {
        self.locks.lock().entry(key.to_string()).or_default().clone()
    }

    fn lease(&self, key: String, held: OwnedMutexGuard<()>) -> TargetLease {
        TargetLease { held: Some(held), key, locks: Arc::clone(&self.locks) }
    }

    /// Wait until no other guarded run holds `target`.
    pub async fn acquire(&self, target: &Target) -> TargetLease {
        let key = target.key();
        let held = self.lock_for(&key).lock_owned().await;
        self.lease(key, held)
    }

    /// Take the target now if it is free.
    pub fn try_acquire(&self, target: &Target) -> Option<TargetLease> {
        let key = target.key();
        let held = self.lock_for(&key).try_lock_owned().ok()?;
        Some(self.lease(key, held))
    }

    pub fn is_busy(&self, target: &Target) -> bool {
        self.locks.lock().get(&target.key()).is_some_and(|lock| lock.try_lock().is_err())
    }

    /// Targets currently held or waited for.
    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
