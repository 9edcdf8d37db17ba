//! Bloom filter doorkeeper: gates admission of one-hit wonders to slow tiers
//!
//! A bloom filter is a probabilistic data structure that can quickly determine
//! if a key is definitely NOT in the set, without the false negatives the
//! doorkeeper contract forbids. False positives are possible and acceptable:
//! they only delay a genuinely-new key's admission by one extra load.

use cacheme_core::Doorkeeper;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Golden-ratio constant used to decorrelate the per-partition mixes below;
/// same trick `splitmix64` uses to avoid a second full hash pass.
const MIX_CONSTANT: u64 = 0x9E3779B97F4A7C15;

/// A thread-safe, partitioned bloom filter optimized for cache negative
/// lookups.
///
/// The bit space is split into `num_hashes` equal partitions, one per hash
/// function, so a single pathological key can only ever saturate its own
/// slice rather than crowding out bits every other hash function relies on.
/// Uses atomic operations for lock-free concurrent access.
pub struct BloomFilter {
    /// Bit array stored as atomic u64s, laid out as `num_hashes` contiguous
    /// partitions.
    bits: Box<[AtomicU64]>,
    /// Number of hash functions (and partitions) in use.
    num_hashes: usize,
    /// Bits per partition, rounded up to a whole number of `u64` words.
    bits_per_partition: usize,
}

impl BloomFilter {
    /// Create a new bloom filter with specified capacity and false positive rate
    ///
    /// # Arguments
    /// * `expected_items` - Expected number of items to store
    /// * `false_positive_rate` - Desired false positive rate (e.g., 0.01 for 1%)
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        // m = -n * ln(p) / (ln(2)^2), k = (m/n) * ln(2)
        let ln2 = std::f64::consts::LN_2;
        let ln2_sq = ln2 * ln2;

        let total_bits =
            (-(expected_items as f64) * false_positive_rate.ln() / ln2_sq).ceil() as usize;
        let total_bits = total_bits.max(64);

        let num_hashes = ((total_bits as f64 / expected_items as f64) * ln2).ceil() as usize;
        let num_hashes = num_hashes.clamp(1, 16);

        Self::with_partitions(total_bits / num_hashes, num_hashes)
    }

    /// Create with an explicit bit budget and hash count.
    pub fn with_size(num_bits: usize, num_hashes: usize) -> Self {
        let num_hashes = num_hashes.max(1);
        Self::with_partitions(num_bits / num_hashes, num_hashes)
    }

    fn with_partitions(bits_per_partition: usize, num_hashes: usize) -> Self {
        let bits_per_partition = bits_per_partition.max(1);
        let words_per_partition = (bits_per_partition + 63) / 64;
        let bits_per_partition = words_per_partition * 64;

        let bits: Box<[AtomicU64]> = (0..words_per_partition * num_hashes)
            .map(|_| AtomicU64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            bits,
            num_hashes,
            bits_per_partition,
        }
    }

    /// Record `key` as seen.
    pub fn mark_seen(&self, key: &str) {
        let base = base_hash(key);
        for partition in 0..self.num_hashes {
            let (word, bit) = self.locate(base, partition);
            self.bits[word].fetch_or(1 << bit, Ordering::Relaxed);
        }
    }

    /// Has `key` (probably) been marked seen before?
    ///
    /// - `false`: definitely not seen.
    /// - `true`: probably seen (may be a false positive).
    pub fn might_have_seen(&self, key: &str) -> bool {
        let base = base_hash(key);
        for partition in 0..self.num_hashes {
            let (word, bit) = self.locate(base, partition);
            if self.bits[word].load(Ordering::Relaxed) & (1 << bit) == 0 {
                return false;
            }
        }
        true
    }

    /// Reset every bit to unseen.
    pub fn clear(&self) {
        for word in self.bits.iter() {
            word.store(0, Ordering::Relaxed);
        }
    }

    /// Total number of bits across all partitions.
    pub fn num_bits(&self) -> usize {
        self.bits_per_partition * self.num_hashes
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Map a key's base hash into one (word, bit-in-word) pair inside the
    /// given partition. Each partition gets its own mixed hash derived from
    /// `base` so two keys colliding in one partition don't necessarily
    /// collide in another.
    fn locate(&self, base: u64, partition: usize) -> (usize, u32) {
        let mixed = splitmix64(base ^ (partition as u64).wrapping_mul(MIX_CONSTANT));
        let offset = (mixed as usize) % self.bits_per_partition;
        let global_bit = partition * self.bits_per_partition + offset;
        (global_bit / 64, (global_bit % 64) as u32)
    }
}

fn base_hash(key: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// `splitmix64`'s output mixer: cheap, well-distributed avalanche from a
/// single 64-bit input, used here to derive one independent index per
/// partition from a single base hash instead of hashing the key again.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

impl Clone for BloomFilter {
    fn clone(&self) -> Self {
        let bits: Box<[AtomicU64]> = self
            .bits
            .iter()
            .map(|b| AtomicU64::new(b.load(Ordering::Relaxed)))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            bits,
            num_hashes: self.num_hashes,
            bits_per_partition: self.bits_per_partition,
        }
    }
}

/// A `Doorkeeper` backed by a lock-free partitioned bloom filter.
///
/// `put` marks a key seen; `contains` asks whether it's probably been seen.
/// Because a bloom filter has no false negatives, the doorkeeper contract
/// ("must never say 'never seen' for a key that was") holds by construction.
pub struct BloomDoorkeeper {
    filter: BloomFilter,
}

impl BloomDoorkeeper {
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        Self {
            filter: BloomFilter::new(expected_items, false_positive_rate),
        }
    }

    pub fn reset(&self) {
        self.filter.clear();
    }
}

impl Doorkeeper for BloomDoorkeeper {
    fn contains(&self, key: &str) -> bool {
        self.filter.might_have_seen(key)
    }

    fn put(&self, key: &str) {
        self.filter.mark_seen(key);
    }
}
