//! Lease counters and peak tracking.
//!
//! Cheap enough to stay on unconditionally; the leak checks in the test suite
//! read these through [`PoolStats`].

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

#[derive(Default)]
pub struct LeaseTracker {
    leases: AtomicUsize,
    releases: AtomicUsize,
    peak_bytes: AtomicUsize,
}

impl LeaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new lease and the pool usage right after it.
    pub fn record_lease(&self, used_bytes: usize) {
        self.leases.fetch_add(1, Ordering::AcqRel);
        self.record_used(used_bytes);
    }

    pub fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::AcqRel);
    }

    /// Updates the peak if `used_bytes` is higher.
    pub fn record_used(&self, used_bytes: usize) {
        let mut cur = self.peak_bytes.load(Ordering::Relaxed);
        while used_bytes > cur {
            match self.peak_bytes.compare_exchange(
                cur,
                used_bytes,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => cur = observed,
            }
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            used_bytes,
            peak = self.peak_bytes.load(Ordering::Relaxed),
            "pool usage"
        );
    }

    pub fn leases(&self) -> usize {
        self.leases.load(Ordering::Acquire)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Acquire)
    }

    pub fn peak(&self) -> usize {
        self.peak_bytes.load(Ordering::Relaxed)
    }
}

/// Point-in-time snapshot of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub leases: usize,
    pub releases: usize,
    pub used_bytes: usize,
    pub peak_bytes: usize,
    pub capacity_bytes: usize,
}

impl PoolStats {
    /// Leases not yet released.
    pub fn outstanding(&self) -> usize {
        self.leases.saturating_sub(self.releases)
    }
}
