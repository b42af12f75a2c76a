//! Yield a default element when the upstream is empty.

use pullseq_core::offset::copy_window;
use pullseq_core::{Offset, Result, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fresh,
    Upstream,
    Done,
}

pub struct DefaultIfEmpty<S: Stage> {
    default: Option<S::Item>,
    phase: Phase,
    source: S,
}

impl<S: Stage> DefaultIfEmpty<S> {
    pub fn new(source: S, default: S::Item) -> Self {
        Self {
            default: Some(default),
            phase: Phase::Fresh,
            source,
        }
    }
}

impl<S> Stage for DefaultIfEmpty<S>
where
    S: Stage,
    S::Item: Clone,
{
    type Item = S::Item;

    fn try_get_count(&self) -> Option<usize> {
        match self.source.try_get_count()? {
            0 => self.default.as_ref().map(|_| 1),
            n => Some(n),
        }
    }

    fn try_get_view(&self) -> Option<&[S::Item]> {
        self.source.try_get_view().filter(|v| !v.is_empty())
    }

    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<S::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool> {
        if self.source.try_get_count() == Some(0) {
            let (Some(default), Some(range)) = (self.default.as_ref(), copy_window(1, offset, len))
            else {
                return Ok(false);
            };
            if !range.is_empty() {
                dest.push(default.clone());
            }
            return Ok(true);
        }
        // Emptiness is unknown or ruled out: delegate. An empty delegated
        // result is ambiguous (empty upstream vs. window past the end), so it
        // is reported as unavailable; `dest` is untouched in that case.
        let mark = dest.len();
        let copied = self.source.try_bulk_copy(dest, offset, len)?;
        Ok(copied && dest.len() > mark)
    }

    fn try_pull_next(&mut self) -> Result<Option<S::Item>> {
        match self.phase {
            Phase::Fresh => match self.source.try_pull_next()? {
                Some(v) => {
                    self.phase = Phase::Upstream;
                    Ok(Some(v))
                }
                None => {
                    self.phase = Phase::Done;
                    Ok(self.default.clone())
                }
            },
            Phase::Upstream => self.source.try_pull_next(),
            Phase::Done => Ok(None),
        }
    }

    fn release(&mut self) {
        self.default = None;
        self.phase = Phase::Done;
        self.source.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FromIter, FromVec};
    use crate::testing::{bulk_all, bulk_at, pull_all};

    #[test]
    fn empty_upstream_yields_default() {
        let mut s = DefaultIfEmpty::new(FromVec::new(vec![]), 9);
        assert_eq!(s.try_get_count(), Some(1));
        assert!(s.try_get_view().is_none());
        assert_eq!(bulk_all(&mut s), Some(vec![9]));
        assert_eq!(bulk_at(&mut s, Offset::Start(1), 1), Some(vec![]));
        assert_eq!(pull_all(&mut s), vec![9]);
    }

    #[test]
    fn non_empty_upstream_passes_through() {
        let mut s = DefaultIfEmpty::new(FromVec::new(vec![1, 2]), 9);
        assert_eq!(s.try_get_count(), Some(2));
        assert_eq!(s.try_get_view(), Some(&[1, 2][..]));
        assert_eq!(bulk_all(&mut s), Some(vec![1, 2]));
        assert_eq!(pull_all(&mut s), vec![1, 2]);
    }

    #[test]
    fn unknown_emptiness_is_never_forced() {
        let mut s = DefaultIfEmpty::new(FromIter::new(Vec::<i32>::new()), 5);
        assert_eq!(s.try_get_count(), None);
        assert_eq!(bulk_all(&mut s), None);
        assert_eq!(pull_all(&mut s), vec![5]);
    }
}
