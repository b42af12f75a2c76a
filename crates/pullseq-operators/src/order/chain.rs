//! Key-chain comparators.
//!
//! A chain is an owned, nested value: `Then<Then<A, B>, C>` compares by `A`,
//! then `B`, then `C`. Keys are extracted once per materialization into a
//! leased column so selectors run O(n) times, not O(n log n).

use std::cmp::Ordering;
use std::marker::PhantomData;

use pullseq_core::{Comparer, Result};
use pullseq_mem::{BufferPool, LeasedBuf};

pub trait KeyChain<T> {
    /// Extracted per-element keys, indexed like the items.
    type Keys;

    fn extract_keys(&self, items: &[T], pool: &BufferPool) -> Result<Self::Keys>;

    /// Compare the elements at positions `a` and `b`. No index tie-break.
    fn compare_at(&self, items: &[T], keys: &Self::Keys, a: usize, b: usize) -> Ordering;

    /// Sort `items` stably without an index map, if this chain allows it.
    /// Returns `false` (and leaves `items` alone) otherwise.
    fn sort_direct(&self, _items: &mut [T]) -> bool {
        false
    }
}

#[inline]
fn directed(ord: Ordering, descending: bool) -> Ordering {
    if descending {
        ord.reverse()
    } else {
        ord
    }
}

/// The element itself under its natural order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByValue {
    descending: bool,
}

impl ByValue {
    pub fn ascending() -> Self {
        Self { descending: false }
    }

    pub fn descending() -> Self {
        Self { descending: true }
    }
}

impl<T: Ord> KeyChain<T> for ByValue {
    type Keys = ();

    fn extract_keys(&self, _items: &[T], _pool: &BufferPool) -> Result<()> {
        Ok(())
    }

    fn compare_at(&self, items: &[T], _keys: &(), a: usize, b: usize) -> Ordering {
        directed(items[a].cmp(&items[b]), self.descending)
    }

    fn sort_direct(&self, items: &mut [T]) -> bool {
        if self.descending {
            items.sort_by(|a, b| b.cmp(a));
        } else {
            items.sort();
        }
        true
    }
}

/// The element itself under a caller comparer.
pub struct ByValueWith<C> {
    comparer: C,
    descending: bool,
}

impl<C> ByValueWith<C> {
    pub fn new(comparer: C, descending: bool) -> Self {
        Self {
            comparer,
            descending,
        }
    }
}

impl<T, C: Comparer<T>> KeyChain<T> for ByValueWith<C> {
    type Keys = ();

    fn extract_keys(&self, _items: &[T], _pool: &BufferPool) -> Result<()> {
        Ok(())
    }

    fn compare_at(&self, items: &[T], _keys: &(), a: usize, b: usize) -> Ordering {
        directed(self.comparer.compare(&items[a], &items[b]), self.descending)
    }
}

/// A projected key under a comparer.
pub struct ByKey<F, K, C> {
    selector: F,
    comparer: C,
    descending: bool,
    _key: PhantomData<fn() -> K>,
}

impl<F, K, C> ByKey<F, K, C> {
    pub fn new(selector: F, comparer: C, descending: bool) -> Self {
        Self {
            selector,
            comparer,
            descending,
            _key: PhantomData,
        }
    }
}

impl<T, F, K, C> KeyChain<T> for ByKey<F, K, C>
where
    F: Fn(&T) -> K,
    C: Comparer<K>,
{
    type Keys = LeasedBuf<K>;

    fn extract_keys(&self, items: &[T], pool: &BufferPool) -> Result<LeasedBuf<K>> {
        let mut keys = pool.lease::<K>(items.len(), "order_by.keys")?;
        keys.extend(items.iter().map(&self.selector))?;
        Ok(keys)
    }

    fn compare_at(&self, _items: &[T], keys: &LeasedBuf<K>, a: usize, b: usize) -> Ordering {
        directed(self.comparer.compare(&keys[a], &keys[b]), self.descending)
    }
}

/// `parent`, falling through to `level` on equality.
pub struct Then<P, L> {
    parent: P,
    level: L,
}

impl<P, L> Then<P, L> {
    pub fn new(parent: P, level: L) -> Self {
        Self { parent, level }
    }
}

impl<T, P: KeyChain<T>, L: KeyChain<T>> KeyChain<T> for Then<P, L> {
    type Keys = (P::Keys, L::Keys);

    fn extract_keys(&self, items: &[T], pool: &BufferPool) -> Result<Self::Keys> {
        Ok((
            self.parent.extract_keys(items, pool)?,
            self.level.extract_keys(items, pool)?,
        ))
    }

    fn compare_at(&self, items: &[T], keys: &Self::Keys, a: usize, b: usize) -> Ordering {
        self.parent
            .compare_at(items, &keys.0, a, b)
            .then_with(|| self.level.compare_at(items, &keys.1, a, b))
    }
}
