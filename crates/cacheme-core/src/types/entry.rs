//! The record stored by and returned from a `Storage`

use chrono::{DateTime, Utc};

/// A value paired with the UTC instant it was written.
///
/// `updated_at` is set by the writer (`Storage::set`/`set_many`), never by
/// the caller. It is the single piece of metadata the tag-invalidation
/// protocol needs: a tag record is just a `CachedData<Vec<u8>>` with an
/// empty payload, and its `updated_at` doubles as "the last time this tag
/// was invalidated".
#[derive(Debug, Clone)]
pub struct CachedData<T> {
    /// The cached payload.
    pub data: T,
    /// When this record was written.
    pub updated_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Wrap a value with the current UTC time.
    pub fn new(data: T) -> Self {
        Self {
            data,
            updated_at: Utc::now(),
        }
    }

    /// Wrap a value with an explicit timestamp (used when replaying a
    /// Locker-table follower's result, which must not claim `load`'s
    /// original timestamp was "now").
    pub fn with_timestamp(data: T, updated_at: DateTime<Utc>) -> Self {
        Self { data, updated_at }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CachedData<U> {
        CachedData {
            data: f(self.data),
            updated_at: self.updated_at,
        }
    }
}
