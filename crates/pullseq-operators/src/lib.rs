#![forbid(unsafe_code)]
//! pullseq-operators: stages implementing the pull protocol.
//!
//! Design intent:
//! - Every stage owns its upstream by value and releases it after its own
//!   state.
//! - Anything a stage materializes goes through a `BufferPool` lease.
//! - Fast paths (view, bulk copy) must agree with plain pulling; the unit
//!   tests in each module compare them against each other.

pub mod drain;
pub mod source;
pub mod window;

pub mod append;
pub mod default_if_empty;
pub mod of_type;
pub mod reverse;
pub mod skip;
pub mod take;

pub mod order;
pub mod set;

pub use append::Append;
pub use default_if_empty::DefaultIfEmpty;
pub use of_type::OfType;
pub use order::{ByKey, ByValue, ByValueWith, KeyChain, OrderBy, OrderBySkipTake, Then};
pub use reverse::Reverse;
pub use set::{Distinct, Except, Union};
pub use skip::Skip;
pub use source::{FromIter, FromRange, FromSlice, FromVec};
pub use take::Take;
pub use window::Window;

#[cfg(test)]
pub(crate) mod testing;
