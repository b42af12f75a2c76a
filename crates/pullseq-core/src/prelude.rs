//! Convenient re-exports for downstream crates.

pub use crate::budget::{BudgetGuard, MemoryBudget};
pub use crate::compare::{Comparer, DefaultEquality, EqualityComparer, KeyEquality, Natural, Reversed};
pub use crate::config::{SeqConfig, SortOptions};
pub use crate::error::{Error, Result};
pub use crate::offset::{copy_window, Offset};
pub use crate::stage::{copy_from_slice, Stage};
