//! cacheme-storage: bundled `Storage` and `Doorkeeper` implementations
//!
//! These are reference implementations of the external contracts `cacheme-core`
//! defines (§6 of the design: storages and doorkeepers are meant to be
//! swappable). `MemoryStorage` is a DashMap-backed in-process tier with a
//! deadline-indexed expiry wheel; `BloomDoorkeeper` wraps a lock-free atomic
//! bloom filter.

mod bloom;
mod expiry;
mod memory;

pub use bloom::{BloomDoorkeeper, BloomFilter};
pub use memory::{MemoryConfig, MemoryStorage};
