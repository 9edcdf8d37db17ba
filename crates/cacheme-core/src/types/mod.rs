//! Core types for cache operations

mod entry;
mod tier;

pub use entry::CachedData;
pub use tier::CacheTier;
