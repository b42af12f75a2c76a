//! Ordering and selection engine.
//!
//! An ordering stage picks one of three strategies on first materialization,
//! depending on how it is read:
//!
//! 1. full sort: drain, then sort the elements directly (natural identity
//!    order) or sort an index map through the key chain and permute;
//! 2. partial sort: a `skip`/`take` window only orders the positions it
//!    covers ([`OrderBySkipTake`]);
//! 3. selection: a single-element read runs quickselect (or a min/max scan)
//!    over an index map and leaves the drained buffer unsorted.
//!
//! Every strategy compares through the same [`KeyChain`] with the source
//! index as the final tie-break, so all three agree with a stable sort.

mod chain;
mod order_by;
pub mod select;
mod skip_take;

pub use chain::{ByKey, ByValue, ByValueWith, KeyChain, Then};
pub use order_by::OrderBy;
pub use skip_take::OrderBySkipTake;

use std::cmp::Ordering;

use pullseq_core::{Error, Result};
use pullseq_mem::{BufferPool, LeasedBuf};

/// Materialization state shared by both ordering stages.
pub(crate) enum OrderState<T> {
    /// Nothing read from upstream yet.
    Pending,
    /// Upstream drained in source order. `map`, when present, is a
    /// permutation of `0..items.len()` left behind by selection.
    Drained {
        items: LeasedBuf<T>,
        map: Option<LeasedBuf<usize>>,
    },
    Sorted(LeasedBuf<T>),
    /// Materialization failed part way. Upstream may be partly consumed, so
    /// every later read reports the same error instead of draining again.
    Failed(Error),
    Released,
}

impl<T> OrderState<T> {
    /// Length once drained.
    pub(crate) fn materialized_len(&self) -> Option<usize> {
        match self {
            OrderState::Drained { items, .. } | OrderState::Sorted(items) => Some(items.len()),
            OrderState::Pending | OrderState::Failed(_) | OrderState::Released => None,
        }
    }

    /// The stored error of a failed stage.
    pub(crate) fn check(&self) -> Result<()> {
        match self {
            OrderState::Failed(e) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    /// Drop any buffers and remember `e` for later reads.
    pub(crate) fn fail(&mut self, e: Error) -> Error {
        *self = OrderState::Failed(e.clone());
        e
    }
}

/// Chain order with the source index as the last key.
#[inline]
pub(crate) fn index_order<T, C: KeyChain<T>>(
    chain: &C,
    items: &[T],
    keys: &C::Keys,
    a: usize,
    b: usize,
) -> Ordering {
    chain.compare_at(items, keys, a, b).then(a.cmp(&b))
}

/// Sort `items` in place by `chain`.
///
/// Uses the direct path when the chain allows it. Otherwise sorts an index
/// map (reusing `keys`/`map` when already built) and applies the permutation.
pub(crate) fn sort_in_place<T, C: KeyChain<T>>(
    items: &mut [T],
    keys: Option<C::Keys>,
    map: Option<LeasedBuf<usize>>,
    chain: &C,
    pool: &BufferPool,
) -> Result<()> {
    if items.len() <= 1 || chain.sort_direct(items) {
        return Ok(());
    }
    let keys = match keys {
        Some(keys) => keys,
        None => chain.extract_keys(items, pool)?,
    };
    let mut map = match map {
        Some(map) => map,
        None => pool.lease_identity(items.len(), "order_by.map")?,
    };
    map.sort_unstable_by(|&a, &b| index_order(chain, items, &keys, a, b));
    apply_permutation(items, &mut map);
    Ok(())
}

/// Reorder so that `items[i]` becomes the old `items[map[i]]`.
///
/// Walks each cycle of the permutation with swaps; `map` is left as the
/// identity.
pub(crate) fn apply_permutation<T>(items: &mut [T], map: &mut [usize]) {
    for start in 0..map.len() {
        if map[start] == start {
            continue;
        }
        let mut cur = start;
        loop {
            let next = map[cur];
            map[cur] = cur;
            if next == start {
                break;
            }
            items.swap(cur, next);
            cur = next;
        }
    }
}
