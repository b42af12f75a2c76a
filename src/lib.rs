#![forbid(unsafe_code)]
//! pullseq: lazy pull-based sequence pipelines.
//!
//! This crate only stitches the workspace together. See [`Pipeline`] for the
//! entry point.

pub use pullseq_core;
pub use pullseq_exec;
pub use pullseq_mem;
pub use pullseq_operators;

pub use pullseq_core::{Error, Offset, Result, SeqConfig, SortOptions, Stage};
pub use pullseq_exec::{Cursor, Pipeline};
pub use pullseq_mem::{BufferPool, PoolStats};

pub mod prelude {
    pub use pullseq_core::prelude::*;
    pub use pullseq_exec::{AccessPath, Cursor, Pipeline};
    pub use pullseq_mem::{BufferPool, PoolStats};
    pub use pullseq_operators::{ByKey, ByValue, ByValueWith, KeyChain, Then, Window};
}
