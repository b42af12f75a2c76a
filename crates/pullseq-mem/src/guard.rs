//! MemoryBudget + RAII guard implementations.
//!
//! The pool acquires a guard before it allocates; dropping the guard returns
//! the bytes to the budget. Counters are atomics so a budget handle can be
//! shared freely, even though stages themselves are driven single-threaded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pullseq_core::budget::{BudgetGuard, MemoryBudget};

struct BudgetInner {
    capacity: usize,
    used: AtomicUsize,
}

impl BudgetInner {
    fn try_acquire(&self, bytes: usize) -> bool {
        let mut cur = self.used.load(Ordering::Relaxed);
        loop {
            let next = match cur.checked_add(bytes) {
                Some(next) if next <= self.capacity => next,
                _ => return false,
            };
            match self
                .used
                .compare_exchange(cur, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return true,
                Err(observed) => cur = observed,
            }
        }
    }

    fn release(&self, bytes: usize) {
        self.used.fetch_sub(bytes, Ordering::AcqRel);
    }
}

/// Byte budget shared by every lease of one pool.
#[derive(Clone)]
pub struct MemoryBudgetImpl {
    inner: Arc<BudgetInner>,
}

impl MemoryBudgetImpl {
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            inner: Arc::new(BudgetInner {
                capacity: capacity_bytes,
                used: AtomicUsize::new(0),
            }),
        }
    }

    fn guard(&self, bytes: usize, tag: &'static str) -> BudgetGuardImpl {
        BudgetGuardImpl {
            inner: Arc::clone(&self.inner),
            bytes,
            tag,
        }
    }
}

/// RAII guard accounting for the bytes of one lease.
pub struct BudgetGuardImpl {
    inner: Arc<BudgetInner>,
    bytes: usize,
    tag: &'static str,
}

impl BudgetGuardImpl {
    /// Resize the accounted byte count. Shrinking always succeeds; growing
    /// fails without side effects when the budget cannot cover the delta.
    pub fn try_resize(&mut self, new_bytes: usize) -> bool {
        if new_bytes <= self.bytes {
            self.inner.release(self.bytes - new_bytes);
            self.bytes = new_bytes;
            return true;
        }
        if self.inner.try_acquire(new_bytes - self.bytes) {
            self.bytes = new_bytes;
            true
        } else {
            false
        }
    }
}

impl Drop for BudgetGuardImpl {
    fn drop(&mut self) {
        if self.bytes > 0 {
            self.inner.release(self.bytes);
            // NOTE: do not log here to keep drop path fast.
            self.bytes = 0;
        }
    }
}

impl BudgetGuard for BudgetGuardImpl {
    fn bytes(&self) -> usize {
        self.bytes
    }
    fn tag(&self) -> &'static str {
        self.tag
    }
}

impl MemoryBudget for MemoryBudgetImpl {
    type Guard = BudgetGuardImpl;

    fn try_acquire(&self, bytes: usize, tag: &'static str) -> Option<Self::Guard> {
        if bytes == 0 || self.inner.try_acquire(bytes) {
            Some(self.guard(bytes, tag))
        } else {
            None
        }
    }

    fn capacity_bytes(&self) -> usize {
        self.inner.capacity
    }

    fn used_bytes(&self) -> usize {
        self.inner.used.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_returns_bytes_on_drop() {
        let budget = MemoryBudgetImpl::new(1024);
        let guard = budget.try_acquire(600, "test").expect("fits");
        assert_eq!(budget.used_bytes(), 600);
        assert!(budget.try_acquire(600, "test").is_none());
        drop(guard);
        assert_eq!(budget.used_bytes(), 0);
    }

    #[test]
    fn resize_grows_and_shrinks() {
        let budget = MemoryBudgetImpl::new(1000);
        let mut guard = budget.try_acquire(100, "test").expect("fits");
        assert!(guard.try_resize(900));
        assert_eq!(budget.used_bytes(), 900);
        assert!(!guard.try_resize(1001));
        assert_eq!(guard.bytes(), 900);
        assert!(guard.try_resize(10));
        assert_eq!(budget.used_bytes(), 10);
    }

    #[test]
    fn overflowing_request_is_refused() {
        let budget = MemoryBudgetImpl::new(usize::MAX);
        let _held = budget.try_acquire(10, "test").expect("fits");
        assert!(budget.try_acquire(usize::MAX, "test").is_none());
        assert_eq!(budget.used_bytes(), 10);
    }
}
