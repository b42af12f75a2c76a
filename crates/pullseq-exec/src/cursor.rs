//! Iteration over a pipeline with guaranteed release.

use pullseq_core::{Result, Stage};

use crate::metrics;

/// Owns a stage while it is being consumed.
///
/// The stage is released exactly once: when the cursor is exhausted, when a
/// pull fails, on an explicit [`Cursor::release`], or on drop, whichever
/// comes first.
pub struct Cursor<S: Stage> {
    pulled: usize,
    released: bool,
    stage: S,
}

impl<S: Stage> Cursor<S> {
    pub fn new(stage: S) -> Self {
        Self {
            pulled: 0,
            released: false,
            stage,
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Release the stage now. Later calls and the drop are no-ops.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.stage.release();
            metrics::record_release(self.pulled);
        }
    }

    pub(crate) fn stage(&self) -> &S {
        &self.stage
    }

    pub(crate) fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }
}

impl<S: Stage> Iterator for Cursor<S> {
    type Item = Result<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.released {
            return None;
        }
        match self.stage.try_pull_next() {
            Ok(Some(v)) => {
                self.pulled += 1;
                Some(Ok(v))
            }
            Ok(None) => {
                self.release();
                None
            }
            Err(e) => {
                self.release();
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.released {
            return (0, Some(0));
        }
        match self.stage.try_get_count() {
            Some(n) => {
                let left = n.saturating_sub(self.pulled);
                (left, Some(left))
            }
            None => (0, None),
        }
    }
}

impl<S: Stage> Drop for Cursor<S> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullseq_core::Offset;
    use pullseq_operators::FromVec;

    /// Counts releases that actually reach the inner stage.
    struct Counted {
        releases: std::rc::Rc<std::cell::Cell<usize>>,
        inner: FromVec<i32>,
    }

    impl Stage for Counted {
        type Item = i32;
        fn try_get_count(&self) -> Option<usize> {
            self.inner.try_get_count()
        }
        fn try_get_view(&self) -> Option<&[i32]> {
            self.inner.try_get_view()
        }
        fn try_bulk_copy(&mut self, dest: &mut Vec<i32>, offset: Offset, len: usize) -> Result<bool> {
            self.inner.try_bulk_copy(dest, offset, len)
        }
        fn try_pull_next(&mut self) -> Result<Option<i32>> {
            self.inner.try_pull_next()
        }
        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
            self.inner.release();
        }
    }

    fn counted(items: Vec<i32>) -> (Counted, std::rc::Rc<std::cell::Cell<usize>>) {
        let releases = std::rc::Rc::new(std::cell::Cell::new(0));
        (
            Counted {
                releases: releases.clone(),
                inner: FromVec::new(items),
            },
            releases,
        )
    }

    #[test]
    fn exhaustion_releases_once() {
        let (stage, releases) = counted(vec![1, 2]);
        let mut cur = Cursor::new(stage);
        assert_eq!(cur.size_hint(), (2, Some(2)));
        let got: Vec<i32> = cur.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(got, vec![1, 2]);
        assert!(cur.is_released());
        assert!(cur.next().is_none());
        drop(cur);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn drop_without_pull_releases_once() {
        let (stage, releases) = counted(vec![1]);
        let mut cur = Cursor::new(stage);
        cur.release();
        cur.release();
        drop(cur);
        assert_eq!(releases.get(), 1);
    }
}
