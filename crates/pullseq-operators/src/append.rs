//! Append one element after the upstream.

use pullseq_core::offset::copy_window;
use pullseq_core::{Offset, Result, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Upstream,
    Tail,
    Done,
}

pub struct Append<S: Stage> {
    value: Option<S::Item>,
    phase: Phase,
    source: S,
}

impl<S: Stage> Append<S> {
    pub fn new(source: S, value: S::Item) -> Self {
        Self {
            value: Some(value),
            phase: Phase::Upstream,
            source,
        }
    }
}

impl<S> Stage for Append<S>
where
    S: Stage,
    S::Item: Clone,
{
    type Item = S::Item;

    fn try_get_count(&self) -> Option<usize> {
        self.value.as_ref()?;
        self.source.try_get_count()?.checked_add(1)
    }

    fn try_get_view(&self) -> Option<&[S::Item]> {
        None
    }

    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<S::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool> {
        let (Some(value), Some(n)) = (self.value.as_ref(), self.source.try_get_count()) else {
            return Ok(false);
        };
        let Some(range) = n.checked_add(1).and_then(|total| copy_window(total, offset, len)) else {
            return Ok(false);
        };
        let upstream_end = range.end.min(n);
        if range.start < upstream_end
            && !self
                .source
                .try_bulk_copy(dest, Offset::Start(range.start), upstream_end - range.start)?
        {
            return Ok(false);
        }
        // The appended element sits at logical position `n`.
        if range.end > n {
            dest.push(value.clone());
        }
        Ok(true)
    }

    fn try_pull_next(&mut self) -> Result<Option<S::Item>> {
        loop {
            match self.phase {
                Phase::Upstream => match self.source.try_pull_next()? {
                    Some(v) => return Ok(Some(v)),
                    None => self.phase = Phase::Tail,
                },
                Phase::Tail => {
                    self.phase = Phase::Done;
                    return Ok(self.value.clone());
                }
                Phase::Done => return Ok(None),
            }
        }
    }

    fn release(&mut self) {
        self.value = None;
        self.phase = Phase::Done;
        self.source.release();
    }
}
