//! Type-erased per-key locker table: stampede control for concurrent misses
//!
//! One `LockerEntry` per `full_key` currently loading. The async mutex
//! serializes callers racing the same key; the slot memoizes the result so
//! a follower that acquires the mutex after the leader finishes gets the
//! already-loaded value back instead of loading again.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

use cacheme_core::Result;
use dashmap::DashMap;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex as AsyncMutex;

/// A boxed, type-erased load future — what a `Memoize` wrapper or
/// `refresh()` hands `get`'s override slot instead of calling `Node::load`.
pub type LoadFuture<V> = Pin<Box<dyn Future<Output = Result<V>> + Send>>;

pub(crate) struct LockerEntry {
    pub(crate) mutex: AsyncMutex<()>,
    pub(crate) slot: SyncMutex<Option<Arc<dyn Any + Send + Sync>>>,
}

static LOCKERS: OnceLock<DashMap<String, Arc<LockerEntry>>> = OnceLock::new();

fn lockers() -> &'static DashMap<String, Arc<LockerEntry>> {
    LOCKERS.get_or_init(DashMap::new)
}

pub(crate) fn locker_for(full_key: &str) -> Arc<LockerEntry> {
    lockers()
        .entry(full_key.to_string())
        .or_insert_with(|| {
            Arc::new(LockerEntry {
                mutex: AsyncMutex::new(()),
                slot: SyncMutex::new(None),
            })
        })
        .clone()
}

/// Drop a key's locker entry. Called by the leader while it still holds the
/// entry's mutex guard, so a new caller arriving after this returns starts
/// a fresh `LockerEntry` rather than reusing one whose slot holds a stale
/// result.
pub(crate) fn remove_locker(full_key: &str) {
    lockers().remove(full_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locker_for_is_stable_until_removed() {
        let a = locker_for("k");
        let b = locker_for("k");
        assert!(Arc::ptr_eq(&a, &b));

        remove_locker("k");
        let c = locker_for("k");
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
