use pullseq_core::{EqualityComparer, Offset, Result, Stage};

use super::Seen;

/// Distinct elements of `first` that do not occur in `second`.
///
/// `second` is drained into the set before the first result is produced.
pub struct Except<S1: Stage, S2, C> {
    seen: Seen<S1::Item, C>,
    seeded: bool,
    first: S1,
    second: S2,
}

impl<S1: Stage, S2, C> Except<S1, S2, C> {
    pub fn new(first: S1, second: S2, comparer: C) -> Self {
        Self {
            seen: Seen::Pending(comparer),
            seeded: false,
            first,
            second,
        }
    }
}

impl<S1, S2, C> Stage for Except<S1, S2, C>
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

    fn try_bulk_copy(
        &mut self,
        _dest: &mut Vec<S1::Item>,
        _offset: Offset,
        _len: usize,
    ) -> Result<bool> {
        Ok(false)
    }

    fn try_pull_next(&mut self) -> Result<Option<S1::Item>> {
        let hint = self.second.try_get_count().unwrap_or(0);
        let Some(set) = self.seen.get(hint) else {
            return Ok(None);
        };
        if !self.seeded {
            while let Some(v) = self.second.try_pull_next()? {
                set.insert(v);
            }
            self.seeded = true;
            self.second.release();
        }
        while let Some(v) = self.first.try_pull_next()? {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FromIter, FromVec};
    use crate::testing::pull_all;
    use pullseq_core::DefaultEquality;

    #[test]
    fn removes_excluded_values() {
        let mut s = Except::new(
            FromVec::new(vec![1, 2, 3]),
            FromVec::new(vec![2]),
            DefaultEquality,
        );
        assert_eq!(pull_all(&mut s), vec![1, 3]);
    }

    #[test]
    fn result_is_deduplicated() {
        let mut s = Except::new(
            FromVec::new(vec![5, 1, 5, 2, 1]),
            FromIter::new(vec![2]),
            DefaultEquality,
        );
        assert_eq!(pull_all(&mut s), vec![5, 1]);
    }

    #[test]
    fn second_is_drained_before_first_yields() {
        let mut s = Except::new(
            FromVec::new(vec![1, 2, 3]),
            FromIter::new(vec![3, 1]),
            DefaultEquality,
        );
        assert_eq!(s.try_pull_next().unwrap(), Some(2));
        assert_eq!(s.try_pull_next().unwrap(), None);
    }
}
