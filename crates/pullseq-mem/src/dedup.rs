//! Insertion-tracking set over a caller equality.
//!
//! Backed by a raw `hashbrown::HashTable` so hashing and equality both go
//! through the [`EqualityComparer`] instead of `Hash + Eq` on the element.

use std::fmt;
use std::hash::Hasher;

use hashbrown::hash_table::Entry;
use hashbrown::HashTable;
use pullseq_core::compare::{DefaultEquality, EqualityComparer};
use rustc_hash::FxHasher;

pub struct DedupSet<T, C = DefaultEquality> {
    table: HashTable<T>,
    comparer: C,
}

#[inline]
fn hash_with<T, C: EqualityComparer<T>>(comparer: &C, value: &T) -> u64 {
    let mut h = FxHasher::default();
    comparer.hash(value, &mut h);
    h.finish()
}

impl<T, C: EqualityComparer<T>> DedupSet<T, C> {
    pub fn new(comparer: C) -> Self {
        Self {
            table: HashTable::new(),
            comparer,
        }
    }

    pub fn with_capacity(capacity: usize, comparer: C) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            comparer,
        }
    }

    /// Insert `value`; `true` when it was not present before.
    pub fn insert(&mut self, value: T) -> bool {
        let Self { table, comparer } = self;
        let hash = hash_with(comparer, &value);
        match table.entry(
            hash,
            |seen| comparer.equals(seen, &value),
            |seen| hash_with(comparer, seen),
        ) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Like [`insert`](Self::insert) but only clones when the value is new.
    pub fn add(&mut self, value: &T) -> bool
    where
        T: Clone,
    {
        let Self { table, comparer } = self;
        let hash = hash_with(comparer, value);
        if table.find(hash, |seen| comparer.equals(seen, value)).is_some() {
            return false;
        }
        table.insert_unique(hash, value.clone(), |seen| hash_with(comparer, seen));
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        let hash = hash_with(&self.comparer, value);
        self.table
            .find(hash, |seen| self.comparer.equals(seen, value))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<T, C: EqualityComparer<T> + Default> Default for DedupSet<T, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for DedupSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.iter()).finish()
    }
}
