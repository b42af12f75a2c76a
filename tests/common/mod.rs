//! Helpers shared by the integration tests.

#![allow(dead_code)]

use pullseq::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn pool() -> BufferPool {
    BufferPool::new(4 * 1024 * 1024)
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_vec(rng: &mut StdRng, len: usize, max: i32) -> Vec<i32> {
    (0..len).map(|_| rng.gen_range(0..max)).collect()
}

pub fn pull_all<S: Stage>(stage: &mut S) -> Vec<S::Item> {
    let mut out = Vec::new();
    while let Some(v) = stage.try_pull_next().expect("pull failed") {
        out.push(v);
    }
    out
}

pub fn bulk_at<S: Stage>(stage: &mut S, offset: Offset, len: usize) -> Option<Vec<S::Item>> {
    let mut out = Vec::new();
    if stage.try_bulk_copy(&mut out, offset, len).expect("bulk copy failed") {
        Some(out)
    } else {
        assert!(out.is_empty(), "declined bulk copy wrote to the destination");
        None
    }
}

/// Elements a bulk copy of `want` at `offset` must produce from `reference`.
pub fn expected_copy<T: Clone>(reference: &[T], offset: Offset, want: usize) -> Vec<T> {
    let len = reference.len();
    let start = match offset {
        Offset::Start(n) => n.min(len),
        Offset::End(n) => len - n,
    };
    let end = start.saturating_add(want).min(len);
    reference[start..end].to_vec()
}

/// Check every accessor of a freshly built stage against `reference`.
///
/// Each accessor gets its own stage so a fast path never sees state left behind
/// by another one.
pub fn assert_equivalent<S, F>(make: F, reference: &[S::Item])
where
    S: Stage,
    S::Item: Clone + PartialEq + std::fmt::Debug,
    F: Fn() -> S,
{
    let mut stage = make();
    if let Some(n) = stage.try_get_count() {
        assert_eq!(n, reference.len(), "count");
    }
    if let Some(view) = stage.try_get_view() {
        assert_eq!(view, reference, "view");
    }
    assert_eq!(pull_all(&mut stage), reference, "pull");
    stage.release();

    let mut stage = make();
    if let Some(all) = bulk_at(&mut stage, Offset::Start(0), usize::MAX) {
        assert_eq!(all, reference, "bulk copy of everything");
    }
    stage.release();

    let len = reference.len();
    for k in 0..=len + 1 {
        for want in [1, 2, 5] {
            let mut stage = make();
            if let Some(got) = bulk_at(&mut stage, Offset::Start(k), want) {
                assert_eq!(got, expected_copy(reference, Offset::Start(k), want), "Start({k}) x {want}");
            }
            stage.release();
        }
    }
    for k in 1..=len {
        let mut stage = make();
        if let Some(got) = bulk_at(&mut stage, Offset::End(k), 2) {
            assert_eq!(got, expected_copy(reference, Offset::End(k), 2), "End({k}) x 2");
        }
        stage.release();
    }
}

/// Stable sort of `items` by `key`, the reference every ordering stage must match.
pub fn stable_sorted_by_key<T: Clone, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut out = items.to_vec();
    out.sort_by_key(|v| key(v));
    out
}

pub fn assert_pool_idle(pool: &BufferPool) {
    let stats = pool.stats();
    assert_eq!(stats.outstanding(), 0, "outstanding leases: {stats:?}");
    assert_eq!(stats.used_bytes, 0, "bytes still accounted: {stats:?}");
}
