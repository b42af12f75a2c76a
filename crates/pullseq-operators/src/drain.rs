//! Materialize an upstream stage into a leased buffer.

use pullseq_core::{Offset, Result, Stage};
use pullseq_mem::{BufferPool, LeasedBuf};

/// Drain `source` completely, cheapest accessor first.
///
/// The lease is sized from the upstream count when known and grows by
/// doubling otherwise. On error the partial buffer is released on drop.
pub fn drain<S>(source: &mut S, pool: &BufferPool, tag: &'static str) -> Result<LeasedBuf<S::Item>>
where
    S: Stage,
    S::Item: Clone,
{
    let mut buf = pool.lease::<S::Item>(source.try_get_count().unwrap_or(0), tag)?;

    if let Some(view) = source.try_get_view() {
        buf.extend_from_slice(view)?;
        return Ok(buf);
    }

    if buf.with_vec(|v| source.try_bulk_copy(v, Offset::Start(0), usize::MAX))?? {
        return Ok(buf);
    }

    while let Some(v) = source.try_pull_next()? {
        buf.push(v)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FromIter, FromRange, FromVec};
    use crate::testing::pool;

    #[test]
    fn drains_through_each_accessor() {
        let pool = pool();
        let viewed = drain(&mut FromVec::new(vec![1, 2, 3]), &pool, "t").unwrap();
        assert_eq!(&viewed[..], &[1, 2, 3]);

        let copied = drain(&mut FromRange::new(0..4), &pool, "t").unwrap();
        assert_eq!(&copied[..], &[0, 1, 2, 3]);

        let pulled = drain(&mut FromIter::new(vec!['a', 'b']), &pool, "t").unwrap();
        assert_eq!(&pulled[..], &['a', 'b']);
    }

    #[test]
    fn drain_fails_on_a_tiny_pool() {
        let pool = BufferPool::new(8);
        let err = drain(&mut FromIter::new(0u64..100), &pool, "t").unwrap_err();
        assert!(matches!(err, pullseq_core::Error::Allocation(_)));
        assert_eq!(pool.stats().used_bytes, 0);
    }
}
