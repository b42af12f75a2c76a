//! Drop the first `n` elements.

use pullseq_core::{Offset, Result, Stage};

pub struct Skip<S> {
    remaining: usize,
    count: usize,
    source: S,
}

impl<S: Stage> Skip<S> {
    pub fn new(source: S, count: usize) -> Self {
        Self {
            remaining: count,
            count,
            source,
        }
    }
}

impl<S: Stage> Stage for Skip<S> {
    type Item = S::Item;

    fn try_get_count(&self) -> Option<usize> {
        Some(self.source.try_get_count()?.saturating_sub(self.count))
    }

    fn try_get_view(&self) -> Option<&[S::Item]> {
        let view = self.source.try_get_view()?;
        Some(&view[self.count.min(view.len())..])
    }

    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<S::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool> {
        match offset {
            Offset::Start(k) => {
                self.source
                    .try_bulk_copy(dest, Offset::Start(k.saturating_add(self.count)), len)
            }
            // End-relative positions must not reach into the skipped prefix,
            // which needs the remaining length.
            Offset::End(k) => match self.try_get_count() {
                Some(remaining) if k <= remaining => {
                    self.source.try_bulk_copy(dest, Offset::End(k), len)
                }
                _ => Ok(false),
            },
        }
    }

    fn try_pull_next(&mut self) -> Result<Option<S::Item>> {
        while self.remaining > 0 {
            self.remaining -= 1;
            if self.source.try_pull_next()?.is_none() {
                self.remaining = 0;
                return Ok(None);
            }
        }
        self.source.try_pull_next()
    }

    fn release(&mut self) {
        self.remaining = 0;
        self.source.release();
    }
}
