#![forbid(unsafe_code)]
//! pullseq-exec: the pipeline root.
//!
//! A [`Pipeline`] is a builder that owns one stage by value. Combinators move
//! the stage into a bigger one; terminal consumers and [`Cursor`] drive it
//! and release it exactly once.

pub mod cursor;
pub mod metrics;
pub mod pipeline;
pub mod terminal;

pub use cursor::Cursor;
pub use metrics::AccessPath;
pub use pipeline::Pipeline;
