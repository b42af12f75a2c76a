//! Abstract memory budget interfaces.
//!
//! The concrete implementation lives in `pullseq-mem`. Only traits live here
//! so stages can name the API without pulling the pool itself.

/// A guard returned by a memory budget when bytes are acquired.
///
/// Must be RAII: dropping the guard hands its bytes back to the budget.
pub trait BudgetGuard: Send {
    /// Number of bytes currently accounted for by this guard.
    fn bytes(&self) -> usize;
    /// Debug tag naming the lease (e.g. `"order_by.buffer"`).
    fn tag(&self) -> &'static str {
        "guard"
    }
}

/// A handle representing a byte-cap enforcer.
///
/// The buffer pool calls `try_acquire` before allocating. `None` means the
/// lease must fail; callers never retry.
pub trait MemoryBudget: Send + Sync + 'static {
    type Guard: BudgetGuard;

    /// Attempt to acquire `bytes` from the live budget. Returns a guard on success.
    fn try_acquire(&self, bytes: usize, tag: &'static str) -> Option<Self::Guard>;

    /// Total configured capacity (bytes).
    fn capacity_bytes(&self) -> usize;

    /// Currently accounted bytes.
    fn used_bytes(&self) -> usize;
}

// NOTE: no default impls here; the mem crate is the only place guards are built.
