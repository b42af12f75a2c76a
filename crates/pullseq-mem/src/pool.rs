//! Budgeted buffer pool.
//!
//! `lease::<T>(capacity)` accounts `capacity * size_of::<T>()` bytes against
//! the pool budget before allocating. The returned [`LeasedBuf`] is the only
//! handle to that memory; dropping it (or calling [`LeasedBuf::release`])
//! gives the bytes back exactly once. Correctness never depends on the pool:
//! a generous budget behaves like plain allocation.

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use once_cell::sync::Lazy;
use pullseq_core::budget::{BudgetGuard, MemoryBudget};
use pullseq_core::config::SeqConfig;

use crate::error::{Error, Result};
use crate::guard::{BudgetGuardImpl, MemoryBudgetImpl};
use crate::tracking::{LeaseTracker, PoolStats};

static GLOBAL: Lazy<BufferPool> = Lazy::new(|| {
    let cfg = SeqConfig::from_env();
    let cap = match cfg.validate() {
        Ok(()) => cfg.pool_cap_bytes,
        Err(_) => SeqConfig::default().pool_cap_bytes,
    };
    BufferPool::new(cap)
});

/// Cheap-to-clone handle; clones share one budget and one tracker.
#[derive(Clone)]
pub struct BufferPool {
    budget: MemoryBudgetImpl,
    tracker: Arc<LeaseTracker>,
}

impl BufferPool {
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            budget: MemoryBudgetImpl::new(capacity_bytes),
            tracker: Arc::new(LeaseTracker::new()),
        }
    }

    pub fn from_config(cfg: &SeqConfig) -> pullseq_core::Result<Self> {
        cfg.validate()?;
        Ok(Self::new(cfg.pool_cap_bytes))
    }

    /// Process-wide pool sized from `SeqConfig::from_env()`.
    pub fn global() -> BufferPool {
        GLOBAL.clone()
    }

    /// Lease a buffer able to hold `capacity` elements without growing.
    pub fn lease<T>(&self, capacity: usize, tag: &'static str) -> Result<LeasedBuf<T>> {
        let bytes = bytes_for::<T>(capacity, tag)?;
        let guard = self.acquire(bytes, tag)?;
        self.tracker.record_lease(self.budget.used_bytes());

        #[cfg(feature = "tracing")]
        tracing::trace!(tag, capacity, bytes, "lease");

        Ok(LeasedBuf {
            buf: Vec::with_capacity(capacity),
            cap: capacity,
            guard,
            pool: self.clone(),
        })
    }

    /// Lease an index map holding the identity permutation `0..len`.
    pub fn lease_identity(&self, len: usize, tag: &'static str) -> Result<LeasedBuf<usize>> {
        let mut map = self.lease::<usize>(len, tag)?;
        map.buf.extend(0..len);
        Ok(map)
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            leases: self.tracker.leases(),
            releases: self.tracker.releases(),
            used_bytes: self.budget.used_bytes(),
            peak_bytes: self.tracker.peak(),
            capacity_bytes: self.budget.capacity_bytes(),
        }
    }

    fn acquire(&self, bytes: usize, tag: &'static str) -> Result<BudgetGuardImpl> {
        self.budget
            .try_acquire(bytes, tag)
            .ok_or_else(|| Error::BudgetExceeded {
                tag,
                requested: bytes,
                capacity: self.budget.capacity_bytes(),
                used: self.budget.used_bytes(),
            })
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool").field("stats", &self.stats()).finish()
    }
}

fn bytes_for<T>(elements: usize, tag: &'static str) -> Result<usize> {
    let elem_bytes = mem::size_of::<T>();
    elements
        .checked_mul(elem_bytes)
        .ok_or(Error::CapacityOverflow {
            tag,
            elements,
            elem_bytes,
        })
}

/// Owned buffer whose bytes are accounted against a pool.
///
/// Single owner; released exactly once on drop. Growth past the leased
/// capacity re-acquires budget first and fails instead of over-committing.
pub struct LeasedBuf<T> {
    buf: Vec<T>,
    cap: usize,
    guard: BudgetGuardImpl,
    pool: BufferPool,
}

impl<T> LeasedBuf<T> {
    /// Elements that fit without another budget acquisition.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn accounted_bytes(&self) -> usize {
        self.guard.bytes()
    }

    pub fn tag(&self) -> &'static str {
        self.guard.tag()
    }

    pub fn push(&mut self, value: T) -> Result<()> {
        if self.buf.len() == self.cap {
            let want = self.cap.saturating_mul(2).max(4);
            self.grow_to(want)?;
        }
        self.buf.push(value);
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<()> {
        for value in iter {
            self.push(value)?;
        }
        Ok(())
    }

    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let need = self.buf.len().saturating_add(values.len());
        if need > self.cap {
            self.grow_to(need)?;
        }
        self.buf.extend_from_slice(values);
        Ok(())
    }

    /// Run `fill` against the backing vector, then re-account any growth.
    ///
    /// Used to hand the buffer to `Stage::try_bulk_copy`. If the budget
    /// cannot cover what `fill` appended, the appended tail is dropped and the
    /// lease keeps its previous size.
    pub fn with_vec<R>(&mut self, fill: impl FnOnce(&mut Vec<T>) -> R) -> Result<R> {
        let mark = self.buf.len();
        let out = fill(&mut self.buf);
        if self.buf.capacity() > self.cap {
            let want = self.buf.capacity();
            if let Err(e) = self.account(want) {
                self.buf.truncate(mark);
                self.buf.shrink_to(self.cap);
                return Err(e);
            }
            self.cap = want;
        }
        Ok(out)
    }

    /// Give the buffer back to the pool now.
    pub fn release(self) {
        drop(self);
    }

    fn grow_to(&mut self, new_cap: usize) -> Result<()> {
        if new_cap <= self.cap {
            return Ok(());
        }
        self.account(new_cap)?;
        self.buf.reserve_exact(new_cap - self.buf.len());
        self.cap = new_cap;
        Ok(())
    }

    fn account(&mut self, new_cap: usize) -> Result<()> {
        let tag = self.guard.tag();
        let bytes = bytes_for::<T>(new_cap, tag)?;
        if !self.guard.try_resize(bytes) {
            return Err(Error::BudgetExceeded {
                tag,
                requested: bytes.saturating_sub(self.guard.bytes()),
                capacity: self.pool.budget.capacity_bytes(),
                used: self.pool.budget.used_bytes(),
            });
        }
        self.pool.tracker.record_used(self.pool.budget.used_bytes());
        Ok(())
    }
}

impl<T> Drop for LeasedBuf<T> {
    fn drop(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(tag = self.guard.tag(), bytes = self.guard.bytes(), "release");
        self.pool.tracker.record_release();
        // `guard` drops after this and returns the bytes.
    }
}

impl<T> Deref for LeasedBuf<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl<T> DerefMut for LeasedBuf<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl<T: fmt::Debug> fmt::Debug for LeasedBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeasedBuf")
            .field("tag", &self.guard.tag())
            .field("cap", &self.cap)
            .field("items", &self.buf)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lease_accounts_element_bytes() {
        let pool = BufferPool::new(1024);
        let buf = pool.lease::<u64>(16, "test").expect("fits");
        assert_eq!(buf.accounted_bytes(), 128);
        assert_eq!(pool.stats().used_bytes, 128);
        buf.release();

        let stats = pool.stats();
        assert_eq!(stats.used_bytes, 0);
        assert_eq!(stats.outstanding(), 0);
        assert_eq!(stats.peak_bytes, 128);
    }

    #[test]
    fn lease_beyond_budget_fails() {
        let pool = BufferPool::new(64);
        let err = pool.lease::<u64>(9, "big").unwrap_err();
        assert!(matches!(err, Error::BudgetExceeded { tag: "big", .. }));
        assert_eq!(pool.stats().leases, 0);
    }

    #[test]
    fn push_grows_within_budget() {
        let pool = BufferPool::new(1024);
        let mut buf = pool.lease::<u32>(0, "grow").expect("empty lease");
        for i in 0..10 {
            buf.push(i).expect("room");
        }
        assert_eq!(&buf[..], &(0..10).collect::<Vec<_>>()[..]);
        assert!(buf.accounted_bytes() >= 40);
        drop(buf);
        assert_eq!(pool.stats().used_bytes, 0);
    }

    #[test]
    fn push_fails_when_budget_is_exhausted() {
        let pool = BufferPool::new(16);
        let mut buf = pool.lease::<u32>(4, "tight").expect("fits");
        for i in 0..4 {
            buf.push(i).expect("room");
        }
        assert!(buf.push(4).is_err());
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn identity_map_is_a_permutation() {
        let pool = BufferPool::new(1024);
        let map = pool.lease_identity(5, "map").expect("fits");
        assert_eq!(&map[..], &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn with_vec_reaccounts_growth() {
        let pool = BufferPool::new(1024);
        let mut buf = pool.lease::<u8>(2, "vec").expect("fits");
        buf.with_vec(|v| v.extend_from_slice(&[1, 2, 3, 4, 5]))
            .expect("budget covers growth");
        assert_eq!(&buf[..], &[1, 2, 3, 4, 5]);
        assert!(buf.accounted_bytes() >= 5);
    }

    #[test]
    fn with_vec_rolls_back_when_budget_is_short() {
        let pool = BufferPool::new(4);
        let mut buf = pool.lease::<u8>(2, "vec").expect("fits");
        buf.push(9).expect("room");
        let res = buf.with_vec(|v| v.extend_from_slice(&[0; 64]));
        assert!(res.is_err());
        assert_eq!(&buf[..], &[9]);
        assert_eq!(buf.accounted_bytes(), 2);
    }
}
