//! The pull-enumerator protocol.
//!
//! A `Stage` is one unit of a lazy pipeline. It owns its upstream stage(s) by
//! value and answers four kinds of requests, cheapest first:
//!
//! 1. `try_get_count` - exact length if it is known without iterating.
//! 2. `try_get_view` - a slice over data that is *already* materialized.
//! 3. `try_bulk_copy` - append a logical range to a caller buffer without
//!    per-element pulling.
//! 4. `try_pull_next` - one element at a time; always available.
//!
//! Consumers try the accessors in the order view > bulk copy > pull. Every fast path must
//! produce exactly what exhaustive pulling would produce.
//!
//! Invariants:
//! - Asking for a count or a view (`try_get_count`, `try_get_view`) never materializes.
//! - `try_bulk_copy` either appends the whole requested window and returns
//!   `Ok(true)`, or leaves `dest` untouched and returns `Ok(false)`.
//! - `release` is idempotent, frees the stage's own state before cascading to
//!   its upstream, and is safe on a stage that never advanced.
//! - Stages are move-only. Nothing in this workspace derives `Clone` on a
//!   stage, so advancing state can never be duplicated.

use crate::error::Result;
use crate::offset::{copy_window, Offset};

pub trait Stage {
    type Item;

    /// Exact element count when it is cheap to know.
    fn try_get_count(&self) -> Option<usize>;

    /// Contiguous view over already materialized elements.
    fn try_get_view(&self) -> Option<&[Self::Item]>;

    /// Append up to `len` elements starting at `offset` to `dest`.
    ///
    /// On `Ok(true)` exactly `min(len, count - start)` elements were appended
    /// (zero when `start` is at or past the end). `Ok(false)` means the fast
    /// path is unavailable and `dest` was not modified.
    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<Self::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool>;

    /// Advance by one element.
    fn try_pull_next(&mut self) -> Result<Option<Self::Item>>;

    /// Dispose owned buffers and upstream stages. Idempotent.
    fn release(&mut self);
}

/// Serve a bulk copy from a materialized slice.
pub fn copy_from_slice<T: Clone>(
    src: &[T],
    dest: &mut Vec<T>,
    offset: Offset,
    len: usize,
) -> bool {
    match copy_window(src.len(), offset, len) {
        Some(range) => {
            dest.extend_from_slice(&src[range]);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_copy_respects_window() {
        let src = [1, 2, 3, 4];
        let mut dest = vec![0];
        assert!(copy_from_slice(&src, &mut dest, Offset::Start(1), 2));
        assert_eq!(dest, vec![0, 2, 3]);

        assert!(copy_from_slice(&src, &mut dest, Offset::End(1), 5));
        assert_eq!(dest, vec![0, 2, 3, 4]);

        assert!(!copy_from_slice(&src, &mut dest, Offset::End(9), 1));
        assert_eq!(dest.len(), 4);
    }
}
