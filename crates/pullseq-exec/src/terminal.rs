//! Terminal consumers.
//!
//! Each consumer tries the accessors in the fixed order view > bulk copy >
//! pull and stops at the first one that answers. The stage is released when
//! the consumer returns, success or not.

use std::hash::Hash;

use pullseq_core::{EqualityComparer, Offset, Result, Stage};
use rustc_hash::FxHashSet;

use crate::cursor::Cursor;
use crate::metrics::{record_access, AccessPath};
use crate::pipeline::Pipeline;

/// One element through a single-element bulk copy, if the stage offers it.
fn bulk_one<S: Stage>(cur: &mut Cursor<S>, offset: Offset) -> Result<Option<Option<S::Item>>> {
    let mut dest = Vec::with_capacity(1);
    if cur.stage_mut().try_bulk_copy(&mut dest, offset, 1)? {
        Ok(Some(dest.pop()))
    } else {
        Ok(None)
    }
}

impl<S: Stage> Pipeline<S> {
    /// Number of elements.
    pub fn count(self) -> Result<usize> {
        let mut cur = self.cursor();
        if let Some(n) = cur.stage().try_get_count() {
            record_access("count", AccessPath::Count);
            return Ok(n);
        }
        if let Some(view) = cur.stage().try_get_view() {
            record_access("count", AccessPath::View);
            return Ok(view.len());
        }
        record_access("count", AccessPath::Pull);
        let mut n = 0;
        while cur.stage_mut().try_pull_next()?.is_some() {
            n += 1;
        }
        Ok(n)
    }

    pub fn first(self) -> Result<Option<S::Item>>
    where
        S::Item: Clone,
    {
        self.element_at(0)
    }

    pub fn last(self) -> Result<Option<S::Item>>
    where
        S::Item: Clone,
    {
        self.element_at_from_end(1)
    }

    /// Element at `index` from the start, `None` when out of range.
    pub fn element_at(self, index: usize) -> Result<Option<S::Item>>
    where
        S::Item: Clone,
    {
        let mut cur = self.cursor();
        if let Some(view) = cur.stage().try_get_view() {
            record_access("element_at", AccessPath::View);
            return Ok(view.get(index).cloned());
        }
        if let Some(hit) = bulk_one(&mut cur, Offset::Start(index))? {
            record_access("element_at", AccessPath::BulkCopy);
            return Ok(hit);
        }
        record_access("element_at", AccessPath::Pull);
        let mut seen = 0;
        while let Some(v) = cur.stage_mut().try_pull_next()? {
            if seen == index {
                return Ok(Some(v));
            }
            seen += 1;
        }
        Ok(None)
    }

    /// Element `from_end` positions before the end; `1` is the last element.
    /// `0` and out-of-range positions give `None`.
    pub fn element_at_from_end(self, from_end: usize) -> Result<Option<S::Item>>
    where
        S::Item: Clone,
    {
        if from_end == 0 {
            return Ok(None);
        }
        let mut cur = self.cursor();
        if let Some(view) = cur.stage().try_get_view() {
            record_access("element_at_from_end", AccessPath::View);
            return Ok(view.len().checked_sub(from_end).map(|i| view[i].clone()));
        }
        if let Some(hit) = bulk_one(&mut cur, Offset::End(from_end))? {
            record_access("element_at_from_end", AccessPath::BulkCopy);
            return Ok(hit);
        }
        if let Some(n) = cur.stage().try_get_count() {
            // A declined end-relative copy with a known count means the
            // position reaches before the first element.
            if from_end > n {
                return Ok(None);
            }
        }
        record_access("element_at_from_end", AccessPath::Pull);
        // Keep only the trailing `from_end` elements.
        let mut tail = std::collections::VecDeque::with_capacity(from_end.min(1024));
        while let Some(v) = cur.stage_mut().try_pull_next()? {
            if tail.len() == from_end {
                tail.pop_front();
            }
            tail.push_back(v);
        }
        Ok(if tail.len() == from_end {
            tail.pop_front()
        } else {
            None
        })
    }

    pub fn to_vec(self) -> Result<Vec<S::Item>>
    where
        S::Item: Clone,
    {
        let mut cur = self.cursor();
        if let Some(view) = cur.stage().try_get_view() {
            record_access("to_vec", AccessPath::View);
            return Ok(view.to_vec());
        }
        let mut out = Vec::with_capacity(cur.stage().try_get_count().unwrap_or(0));
        if cur
            .stage_mut()
            .try_bulk_copy(&mut out, Offset::Start(0), usize::MAX)?
        {
            record_access("to_vec", AccessPath::BulkCopy);
            return Ok(out);
        }
        record_access("to_vec", AccessPath::Pull);
        while let Some(v) = cur.stage_mut().try_pull_next()? {
            out.push(v);
        }
        Ok(out)
    }

    pub fn contains(self, value: &S::Item) -> Result<bool>
    where
        S::Item: PartialEq,
    {
        let mut cur = self.cursor();
        if let Some(view) = cur.stage().try_get_view() {
            record_access("contains", AccessPath::View);
            return Ok(view.contains(value));
        }
        record_access("contains", AccessPath::Pull);
        while let Some(v) = cur.stage_mut().try_pull_next()? {
            if v == *value {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn contains_by<C>(self, value: &S::Item, comparer: &C) -> Result<bool>
    where
        C: EqualityComparer<S::Item>,
    {
        let mut cur = self.cursor();
        if let Some(view) = cur.stage().try_get_view() {
            record_access("contains_by", AccessPath::View);
            return Ok(view.iter().any(|v| comparer.equals(v, value)));
        }
        record_access("contains_by", AccessPath::Pull);
        while let Some(v) = cur.stage_mut().try_pull_next()? {
            if comparer.equals(&v, value) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn to_set(self) -> Result<FxHashSet<S::Item>>
    where
        S::Item: Clone + Hash + Eq,
    {
        let mut cur = self.cursor();
        if let Some(view) = cur.stage().try_get_view() {
            record_access("to_set", AccessPath::View);
            return Ok(view.iter().cloned().collect());
        }
        record_access("to_set", AccessPath::Pull);
        let mut set = FxHashSet::default();
        while let Some(v) = cur.stage_mut().try_pull_next()? {
            set.insert(v);
        }
        Ok(set)
    }
}
