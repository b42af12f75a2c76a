#![forbid(unsafe_code)]
//! pullseq-mem: byte budgeting, leased buffers and the dedup set.
//!
//! Every buffer a stage materializes (drained sources, index maps, key
//! columns) is leased from a [`BufferPool`]. A lease is accounted against a
//! hard byte budget through an RAII guard, so releasing a buffer is simply
//! dropping it and can happen at most once.

pub mod dedup;
pub mod error;
pub mod guard;
pub mod pool;
pub mod tracking;

pub use dedup::DedupSet;
pub use guard::{BudgetGuardImpl, MemoryBudgetImpl};
pub use pool::{BufferPool, LeasedBuf};
pub use tracking::{LeaseTracker, PoolStats};
