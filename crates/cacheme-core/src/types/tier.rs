//! A single entry in a node's ordered cache-tier list

use std::time::Duration;

/// One storage tier declared by a `Node`, fast-to-slow.
///
/// `storage` names a `Storage` registered with `cacheme::register_storage`.
/// `ttl` is `None` for entries that never expire on their own (they still
/// fall out of cache via `invalidate`/tag invalidation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTier {
    pub storage: &'static str,
    pub ttl: Option<Duration>,
}

impl CacheTier {
    pub const fn new(storage: &'static str, ttl: Option<Duration>) -> Self {
        Self { storage, ttl }
    }

    pub const fn no_ttl(storage: &'static str) -> Self {
        Self { storage, ttl: None }
    }

    pub const fn with_ttl(storage: &'static str, ttl: Duration) -> Self {
        Self {
            storage,
            ttl: Some(ttl),
        }
    }
}
