#![forbid(unsafe_code)]
//! pullseq-core: the pull-enumerator protocol and the vocabulary shared by
//! every other crate in the workspace.
//!
//! Concrete allocators live in `pullseq-mem`, stages in `pullseq-operators`
//! and the pipeline root in `pullseq-exec`. This crate only defines traits and
//! small value types so any crate can speak the protocol without pulling the
//! operator logic.

pub mod budget;
pub mod compare;
pub mod config;
pub mod error;
pub mod offset;
pub mod prelude;
pub mod stage;

pub use compare::{Comparer, DefaultEquality, EqualityComparer, KeyEquality, Natural, Reversed};
pub use config::{SeqConfig, SortOptions};
pub use error::{Error, Result};
pub use offset::Offset;
pub use stage::Stage;
