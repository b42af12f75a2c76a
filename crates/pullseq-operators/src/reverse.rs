//! Reverse the upstream order.
//!
//! No O(1) fast path exists: the view only appears once the reversed buffer
//! has been materialized. A bulk copy of the whole sequence is the exception;
//! it copies straight from upstream and reverses the destination in place.

use pullseq_core::stage::copy_from_slice;
use pullseq_core::{Error, Offset, Result, Stage};
use pullseq_mem::{BufferPool, LeasedBuf};

use crate::drain::drain;

pub struct Reverse<S: Stage> {
    buf: Option<LeasedBuf<S::Item>>,
    /// Set when draining failed; upstream may be partly consumed.
    failed: Option<Error>,
    pos: usize,
    released: bool,
    pool: BufferPool,
    source: S,
}

impl<S: Stage> Reverse<S>
where
    S::Item: Clone,
{
    pub fn new(source: S, pool: BufferPool) -> Self {
        Self {
            buf: None,
            failed: None,
            pos: 0,
            released: false,
            pool,
            source,
        }
    }

    fn materialize(&mut self) -> Result<()> {
        if let Some(e) = &self.failed {
            return Err(e.clone());
        }
        if self.buf.is_none() && !self.released {
            match drain(&mut self.source, &self.pool, "reverse.buffer") {
                Ok(mut buf) => {
                    buf.reverse();
                    self.buf = Some(buf);
                }
                Err(e) => {
                    self.failed = Some(e.clone());
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

impl<S: Stage> Stage for Reverse<S>
where
    S::Item: Clone,
{
    type Item = S::Item;

    fn try_get_count(&self) -> Option<usize> {
        match &self.buf {
            Some(buf) => Some(buf.len()),
            None if self.released || self.failed.is_some() => None,
            None => self.source.try_get_count(),
        }
    }

    fn try_get_view(&self) -> Option<&[S::Item]> {
        self.buf.as_deref()
    }

    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<S::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool> {
        if self.buf.is_none() && !self.released && self.failed.is_none() {
            if let Some(n) = self.source.try_get_count() {
                if offset.resolve(n) == Some(0) && len >= n {
                    let mark = dest.len();
                    if self.source.try_bulk_copy(dest, Offset::Start(0), n)? {
                        dest[mark..].reverse();
                        return Ok(true);
                    }
                }
            }
        }
        self.materialize()?;
        Ok(match &self.buf {
            Some(buf) => copy_from_slice(buf, dest, offset, len),
            None => false,
        })
    }

    fn try_pull_next(&mut self) -> Result<Option<S::Item>> {
        self.materialize()?;
        let next = self.buf.as_ref().and_then(|b| b.get(self.pos).cloned());
        if next.is_some() {
            self.pos += 1;
        }
        Ok(next)
    }

    fn release(&mut self) {
        self.buf = None;
        self.failed = None;
        self.released = true;
        self.source.release();
    }
}
