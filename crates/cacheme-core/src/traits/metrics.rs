//! Per-node-class request/hit/load accounting

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters accumulated for one node class.
///
/// One `Metrics` is created per non-internal node class, the first time
/// the class is touched by `get`/`get_all`/`refresh`/`stats`. Counters use
/// `Relaxed` ordering: the accounting is best-effort under concurrency (no
/// total order across counters is promised), but each individual counter
/// is exact at quiescence.
#[derive(Debug, Default)]
pub struct Metrics {
    request_count: AtomicU64,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    load_success_count: AtomicU64,
    load_failure_count: AtomicU64,
    total_load_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_request(&self, n: u64) {
        self.request_count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_hit(&self, n: u64) {
        self.hit_count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_miss(&self, n: u64) {
        self.miss_count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_load_success(&self, n: u64, elapsed_ns: u64) {
        self.load_success_count.fetch_add(n, Ordering::Relaxed);
        self.total_load_time_ns.fetch_add(elapsed_ns, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self, n: u64, elapsed_ns: u64) {
        self.load_failure_count.fetch_add(n, Ordering::Relaxed);
        self.total_load_time_ns.fetch_add(elapsed_ns, Ordering::Relaxed);
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn hit_count(&self) -> u64 {
        self.hit_count.load(Ordering::Relaxed)
    }

    pub fn miss_count(&self) -> u64 {
        self.miss_count.load(Ordering::Relaxed)
    }

    pub fn load_success_count(&self) -> u64 {
        self.load_success_count.load(Ordering::Relaxed)
    }

    pub fn load_failure_count(&self) -> u64 {
        self.load_failure_count.load(Ordering::Relaxed)
    }

    pub fn load_count(&self) -> u64 {
        self.load_success_count() + self.load_failure_count()
    }

    pub fn total_load_time_ns(&self) -> u64 {
        self.total_load_time_ns.load(Ordering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let req = self.request_count();
        if req == 0 {
            0.0
        } else {
            self.hit_count() as f64 / req as f64
        }
    }

    pub fn miss_rate(&self) -> f64 {
        let req = self.request_count();
        if req == 0 {
            0.0
        } else {
            self.miss_count() as f64 / req as f64
        }
    }
}
