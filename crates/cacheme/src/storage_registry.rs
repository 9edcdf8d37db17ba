//! Process-wide registry mapping a tier's storage name to its backing `Storage`

use std::sync::{Arc, OnceLock};

use cacheme_core::{CacheError, Result, Storage};
use cacheme_storage::MemoryStorage;
use dashmap::DashMap;
use parking_lot::RwLock;

static STORAGES: OnceLock<DashMap<&'static str, Arc<dyn Storage>>> = OnceLock::new();
static TAG_STORE: OnceLock<RwLock<Arc<dyn Storage>>> = OnceLock::new();

fn storages() -> &'static DashMap<&'static str, Arc<dyn Storage>> {
    STORAGES.get_or_init(DashMap::new)
}

/// Register (or replace) the backing `Storage` for a tier name. Node tier
/// lists reference storages by this name.
pub fn register_storage(name: &'static str, storage: Arc<dyn Storage>) {
    storages().insert(name, storage);
}

pub(crate) fn storage_by_name(name: &str) -> Result<Arc<dyn Storage>> {
    storages().get(name).map(|e| e.clone()).ok_or_else(|| {
        CacheError::StorageError(format!("no storage registered under name '{name}'"))
    })
}

fn tag_store_lock() -> &'static RwLock<Arc<dyn Storage>> {
    TAG_STORE.get_or_init(|| RwLock::new(Arc::new(MemoryStorage::new())))
}

pub(crate) fn tag_storage() -> Arc<dyn Storage> {
    tag_store_lock().read().clone()
}

/// Override the backing store for tag-invalidation records. Defaults to an
/// in-process `MemoryStorage`, which is enough for a single-process
/// deployment but loses tag state across restarts.
pub fn set_tag_storage(storage: Arc<dyn Storage>) {
    *tag_store_lock().write() = storage;
}
