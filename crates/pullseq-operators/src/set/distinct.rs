use pullseq_core::{EqualityComparer, Offset, Result, Stage};

use super::Seen;

pub struct Distinct<S: Stage, C> {
    seen: Seen<S::Item, C>,
    source: S,
}

impl<S: Stage, C> Distinct<S, C> {
    pub fn new(source: S, comparer: C) -> Self {
        Self {
            seen: Seen::Pending(comparer),
            source,
        }
    }
}

impl<S, C> Stage for Distinct<S, C>
where
    S: Stage,
    S::Item: Clone,
    C: EqualityComparer<S::Item>,
{
    type Item = S::Item;

    fn try_get_count(&self) -> Option<usize> {
        None
    }

    fn try_get_view(&self) -> Option<&[S::Item]> {
        None
    }

    /// Only the first element is known without deduplicating.
    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<S::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool> {
        if offset == Offset::Start(0) && len == 1 {
            return self.source.try_bulk_copy(dest, offset, 1);
        }
        Ok(false)
    }

    fn try_pull_next(&mut self) -> Result<Option<S::Item>> {
        let hint = self.source.try_get_count().unwrap_or(0);
        let Some(set) = self.seen.get(hint) else {
            return Ok(None);
        };
        while let Some(v) = self.source.try_pull_next()? {
            if set.add(&v) {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    fn release(&mut self) {
        self.seen.release();
        self.source.release();
    }
}
