//! Keep only the first `n` elements.

use pullseq_core::{Offset, Result, Stage};

pub struct Take<S> {
    taken: usize,
    limit: usize,
    source: S,
}

impl<S: Stage> Take<S> {
    pub fn new(source: S, limit: usize) -> Self {
        Self {
            taken: 0,
            limit,
            source,
        }
    }
}

impl<S: Stage> Stage for Take<S> {
    type Item = S::Item;

    fn try_get_count(&self) -> Option<usize> {
        Some(self.source.try_get_count()?.min(self.limit))
    }

    fn try_get_view(&self) -> Option<&[S::Item]> {
        let view = self.source.try_get_view()?;
        Some(&view[..self.limit.min(view.len())])
    }

    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<S::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool> {
        let start = match offset {
            Offset::Start(k) => k,
            Offset::End(k) => match self.try_get_count().and_then(|n| n.checked_sub(k)) {
                Some(start) => start,
                None => return Ok(false),
            },
        };
        if start >= self.limit {
            return Ok(true);
        }
        let want = len.min(self.limit - start);
        self.source.try_bulk_copy(dest, Offset::Start(start), want)
    }

    fn try_pull_next(&mut self) -> Result<Option<S::Item>> {
        if self.taken >= self.limit {
            return Ok(None);
        }
        let next = self.source.try_pull_next()?;
        if next.is_some() {
            self.taken += 1;
        }
        Ok(next)
    }

    fn release(&mut self) {
        self.taken = self.limit;
        self.source.release();
    }
}
