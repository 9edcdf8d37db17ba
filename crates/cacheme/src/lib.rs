//! cacheme: typed, asynchronous, multi-tier caching
//!
//! # Features
//!
//! - **Typed nodes**: a `Node` impl is both the cache key and the schema for
//!   its value — no stringly-typed keys to get wrong.
//! - **Multi-tier reads**: each node declares its own ordered tier list,
//!   fastest first, and `get`/`get_all` walk it with backfill on a partial
//!   hit.
//! - **Stampede control**: concurrent misses on the same key coalesce into
//!   one load.
//! - **Tag invalidation**: group many nodes under a tag and invalidate them
//!   all at once.
//! - **Memoization**: wrap a plain async function in caching without
//!   writing a `Node` impl by hand.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use cacheme::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct UserNode { id: u64 }
//!
//! #[async_trait::async_trait]
//! impl Node for UserNode {
//!     type Value = String;
//!
//!     fn key(&self) -> String { self.id.to_string() }
//!     fn version(&self) -> &str { "v1" }
//!     fn tiers(&self) -> &[CacheTier] {
//!         const TIERS: [CacheTier; 1] = [CacheTier::no_ttl("local")];
//!         &TIERS
//!     }
//!
//!     async fn load(&self) -> Result<Self::Value> {
//!         Ok(format!("user-{}", self.id))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     register_storage("local", Arc::new(MemoryStorage::new()));
//!     let name = get(&UserNode { id: 42 }).await?;
//!     println!("{name}");
//!     Ok(())
//! }
//! ```

mod get;
mod get_all;
mod invalidate;
mod locker;
mod memoize;
mod prefix;
mod registry;
mod storage_registry;


pub use cacheme_core::{
    CacheError, CacheTier, CachedData, Doorkeeper, JsonSerializer, Metrics, Node, Result,
    Serializer, Storage,
};

#[cfg(feature = "msgpack")]
pub use cacheme_core::MsgPackSerializer;

#[cfg(feature = "bincode")]
pub use cacheme_core::BincodeSerializer;

pub use cacheme_storage::{BloomDoorkeeper, BloomFilter, MemoryConfig, MemoryStorage};

#[cfg(feature = "derive")]
pub use cacheme_derive::NodeKey;

pub use get::get;
pub use get_all::get_all;
pub use invalidate::{invalid_tag, invalidate, refresh};
pub use locker::LoadFuture;
pub use memoize::{memoize_fn, memoize_method};
pub use prefix::{full_key, get_prefix, set_prefix};
pub use registry::{metrics_for, nodes, stats};
pub use storage_registry::{register_storage, set_tag_storage};

/// Convenient glob import of everything most callers need.
pub mod prelude {
    pub use crate::{
        full_key, get, get_all, get_prefix, invalid_tag, invalidate, memoize_fn, memoize_method,
        metrics_for, nodes, refresh, register_storage, set_prefix, set_tag_storage, stats,
        BloomDoorkeeper, BloomFilter, CacheError, CacheTier, CachedData, Doorkeeper,
        JsonSerializer, MemoryConfig, MemoryStorage, Metrics, Node, Result, Serializer, Storage,
    };

    #[cfg(feature = "msgpack")]
    pub use crate::MsgPackSerializer;

    #[cfg(feature = "bincode")]
    pub use crate::BincodeSerializer;

    #[cfg(feature = "derive")]
    pub use crate::NodeKey;
}
