//! Deadline-indexed expiry tracking for `MemoryStorage`
//!
//! Rather than a fixed ring of buckets sized for a worst-case `max_ttl`,
//! keys are grouped into coarse ticks of an absolute clock and kept in a
//! sparse `BTreeMap`. A TTL of a week costs the same as a TTL of a second:
//! one entry in the map, reclaimed the first time `sweep` runs past it.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Tracks which keys are due to expire and when.
pub struct ExpiryWheel {
    resolution: Duration,
    epoch: Instant,
    due: BTreeMap<u64, Vec<String>>,
    tick_of: HashMap<String, u64>,
}

impl ExpiryWheel {
    /// `resolution` is how finely expirations are coalesced: two keys
    /// scheduled within the same `resolution`-wide window expire on the
    /// same sweep.
    pub fn new(resolution: Duration) -> Self {
        Self {
            resolution: resolution.max(Duration::from_millis(1)),
            epoch: Instant::now(),
            due: BTreeMap::new(),
            tick_of: HashMap::new(),
        }
    }

    fn tick_at(&self, instant: Instant) -> u64 {
        let elapsed = instant.saturating_duration_since(self.epoch);
        (elapsed.as_nanos() / self.resolution.as_nanos().max(1)) as u64
    }

    /// Schedule `key` to expire after `ttl`, replacing any prior schedule.
    pub fn schedule(&mut self, key: String, ttl: Duration) {
        self.remove(&key);
        // +1 guarantees a key is never swept on the same tick it was
        // scheduled, even if `ttl` rounds down to zero ticks.
        let tick = self.tick_at(Instant::now() + ttl) + 1;
        self.due.entry(tick).or_default().push(key.clone());
        self.tick_of.insert(key, tick);
    }

    /// Drop `key`'s schedule, if any.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.tick_of.remove(key) {
            if let Some(keys) = self.due.get_mut(&tick) {
                keys.retain(|k| k != key);
                if keys.is_empty() {
                    self.due.remove(&tick);
                }
            }
        }
    }

    /// Is `key` currently scheduled?
    pub fn contains(&self, key: &str) -> bool {
        self.tick_of.contains_key(key)
    }

    /// Drain and return every key whose tick has passed.
    pub fn sweep(&mut self) -> Vec<String> {
        let now_tick = self.tick_at(Instant::now());
        let due_ticks: Vec<u64> = self.due.range(..=now_tick).map(|(t, _)| *t).collect();

        let mut expired = Vec::new();
        for tick in due_ticks {
            if let Some(keys) = self.due.remove(&tick) {
                for key in &keys {
                    self.tick_of.remove(key);
                }
                expired.extend(keys);
            }
        }
        expired
    }

    /// Number of keys currently scheduled.
    pub fn len(&self) -> usize {
        self.tick_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tick_of.is_empty()
    }

    /// Drop every scheduled key.
    pub fn clear(&mut self) {
        self.due.clear();
        self.tick_of.clear();
    }
}

impl Default for ExpiryWheel {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
