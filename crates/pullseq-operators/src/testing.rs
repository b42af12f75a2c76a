//! Helpers shared by the unit tests of this crate.

use pullseq_core::{Offset, Stage};
use pullseq_mem::BufferPool;

pub(crate) fn pool() -> BufferPool {
    BufferPool::new(1 << 20)
}

pub(crate) fn pull_all<S: Stage>(stage: &mut S) -> Vec<S::Item> {
    let mut out = Vec::new();
    while let Some(v) = stage.try_pull_next().unwrap() {
        out.push(v);
    }
    out
}

pub(crate) fn bulk_at<S: Stage>(stage: &mut S, offset: Offset, len: usize) -> Option<Vec<S::Item>> {
    let mut out = Vec::new();
    if stage.try_bulk_copy(&mut out, offset, len).unwrap() {
        Some(out)
    } else {
        assert!(out.is_empty(), "declined bulk copy wrote to dest");
        None
    }
}

pub(crate) fn bulk_all<S: Stage>(stage: &mut S) -> Option<Vec<S::Item>> {
    bulk_at(stage, Offset::Start(0), usize::MAX)
}
