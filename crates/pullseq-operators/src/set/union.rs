use pullseq_core::{EqualityComparer, Offset, Result, Stage};

use super::Seen;

/// Distinct elements of `first` followed by unseen elements of `second`.
pub struct Union<S1: Stage, S2, C> {
    seen: Seen<S1::Item, C>,
    first_done: bool,
    first: S1,
    second: S2,
}

impl<S1: Stage, S2, C> Union<S1, S2, C> {
    pub fn new(first: S1, second: S2, comparer: C) -> Self {
        Self {
            seen: Seen::Pending(comparer),
            first_done: false,
            first,
            second,
        }
    }
}

impl<S1, S2, C> Stage for Union<S1, S2, C>
where
    S1: Stage,
    S1::Item: Clone,
    S2: Stage<Item = S1::Item>,
    C: EqualityComparer<S1::Item>,
{
    type Item = S1::Item;

    fn try_get_count(&self) -> Option<usize> {
        None
    }

    fn try_get_view(&self) -> Option<&[S1::Item]> {
        None
    }

    /// The first element comes from `first`, or from `second` when `first`
    /// is known to be empty.
    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<S1::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool> {
        if offset != Offset::Start(0) || len != 1 {
            return Ok(false);
        }
        let mark = dest.len();
        if self.first.try_bulk_copy(dest, offset, 1)? && dest.len() > mark {
            return Ok(true);
        }
        if self.first.try_get_count() == Some(0) {
            return self.second.try_bulk_copy(dest, offset, 1);
        }
        Ok(false)
    }

    fn try_pull_next(&mut self) -> Result<Option<S1::Item>> {
        let hint = self
            .first
            .try_get_count()
            .unwrap_or(0)
            .saturating_add(self.second.try_get_count().unwrap_or(0));
        let Some(set) = self.seen.get(hint) else {
            return Ok(None);
        };
        if !self.first_done {
            while let Some(v) = self.first.try_pull_next()? {
                if set.add(&v) {
                    return Ok(Some(v));
                }
            }
            self.first_done = true;
        }
        while let Some(v) = self.second.try_pull_next()? {
            if set.add(&v) {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    fn release(&mut self) {
        self.seen.release();
        self.first.release();
        self.second.release();
    }
}
