//! Leaf stages.
//!
//! Sources answer every accessor they can without work. After `release` they
//! behave as empty.

use std::ops::Range;

use pullseq_core::offset::{copy_window, Offset};
use pullseq_core::stage::{copy_from_slice, Stage};
use pullseq_core::Result;

/// Owned vector. Full view, bulk copy and pull.
pub struct FromVec<T> {
    items: Vec<T>,
    pos: usize,
}

impl<T> FromVec<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, pos: 0 }
    }
}

impl<T: Clone> Stage for FromVec<T> {
    type Item = T;

    fn try_get_count(&self) -> Option<usize> {
        Some(self.items.len())
    }

    fn try_get_view(&self) -> Option<&[T]> {
        Some(&self.items)
    }

    fn try_bulk_copy(&mut self, dest: &mut Vec<T>, offset: Offset, len: usize) -> Result<bool> {
        Ok(copy_from_slice(&self.items, dest, offset, len))
    }

    fn try_pull_next(&mut self) -> Result<Option<T>> {
        let next = self.items.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        Ok(next)
    }

    fn release(&mut self) {
        self.items = Vec::new();
        self.pos = 0;
    }
}

/// Borrowed slice; the view is zero-copy.
pub struct FromSlice<'a, T> {
    items: &'a [T],
    pos: usize,
}

impl<'a, T> FromSlice<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, pos: 0 }
    }
}

impl<'a, T: Clone> Stage for FromSlice<'a, T> {
    type Item = T;

    fn try_get_count(&self) -> Option<usize> {
        Some(self.items.len())
    }

    fn try_get_view(&self) -> Option<&[T]> {
        Some(self.items)
    }

    fn try_bulk_copy(&mut self, dest: &mut Vec<T>, offset: Offset, len: usize) -> Result<bool> {
        Ok(copy_from_slice(self.items, dest, offset, len))
    }

    fn try_pull_next(&mut self) -> Result<Option<T>> {
        let next = self.items.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        Ok(next)
    }

    fn release(&mut self) {
        self.items = &[];
        self.pos = 0;
    }
}

/// Half-open integer range. Count and bulk copy, but nothing to view.
pub struct FromRange {
    first: i64,
    len: usize,
    pos: usize,
}

impl FromRange {
    /// An inverted range is empty.
    pub fn new(range: Range<i64>) -> Self {
        let len = range
            .end
            .checked_sub(range.start)
            .and_then(|d| usize::try_from(d).ok())
            .unwrap_or(0);
        Self {
            first: range.start,
            len,
            pos: 0,
        }
    }

    fn value_at(&self, i: usize) -> i64 {
        // `i < len` and `len` came from an i64 difference, so this stays in range.
        self.first.wrapping_add(i as i64)
    }
}

impl Stage for FromRange {
    type Item = i64;

    fn try_get_count(&self) -> Option<usize> {
        Some(self.len)
    }

    fn try_get_view(&self) -> Option<&[i64]> {
        None
    }

    fn try_bulk_copy(&mut self, dest: &mut Vec<i64>, offset: Offset, len: usize) -> Result<bool> {
        let Some(range) = copy_window(self.len, offset, len) else {
            return Ok(false);
        };
        dest.extend(range.map(|i| self.value_at(i)));
        Ok(true)
    }

    fn try_pull_next(&mut self) -> Result<Option<i64>> {
        if self.pos >= self.len {
            return Ok(None);
        }
        let v = self.value_at(self.pos);
        self.pos += 1;
        Ok(Some(v))
    }

    fn release(&mut self) {
        self.len = 0;
        self.pos = 0;
    }
}

/// Any iterator. Pull only: no count, no view, no bulk copy.
pub struct FromIter<I> {
    iter: Option<I>,
}

impl<I: Iterator> FromIter<I> {
    pub fn new<II: IntoIterator<IntoIter = I>>(items: II) -> Self {
        Self {
            iter: Some(items.into_iter()),
        }
    }
}

impl<I: Iterator> Stage for FromIter<I> {
    type Item = I::Item;

    fn try_get_count(&self) -> Option<usize> {
        None
    }

    fn try_get_view(&self) -> Option<&[I::Item]> {
        None
    }

    fn try_bulk_copy(
        &mut self,
        _dest: &mut Vec<I::Item>,
        _offset: Offset,
        _len: usize,
    ) -> Result<bool> {
        Ok(false)
    }

    fn try_pull_next(&mut self) -> Result<Option<I::Item>> {
        Ok(self.iter.as_mut().and_then(Iterator::next))
    }

    fn release(&mut self) {
        self.iter = None;
    }
}
