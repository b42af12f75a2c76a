use pullseq_core::offset::copy_window;
use pullseq_core::{Offset, Result, SortOptions, Stage};
use pullseq_mem::BufferPool;

use super::chain::KeyChain;
use super::select::partial_sort;
use super::{index_order, OrderState};
use crate::drain::drain;

/// An ordered stage restricted to positions `start..end`.
///
/// Only the window is ordered: a partial quicksort over the index map leaves
/// positions outside it unsorted, and reads go through the map. `end` is
/// `usize::MAX` while no `take` has been applied.
pub struct OrderBySkipTake<S: Stage, C: KeyChain<S::Item>> {
    state: OrderState<S::Item>,
    keys: Option<C::Keys>,
    /// The window of `state` is ordered and readable.
    ready: bool,
    pos: usize,
    start: usize,
    end: usize,
    chain: C,
    pool: BufferPool,
    options: SortOptions,
    source: S,
}

impl<S, C> OrderBySkipTake<S, C>
where
    S: Stage,
    S::Item: Clone,
    C: KeyChain<S::Item>,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        state: OrderState<S::Item>,
        keys: Option<C::Keys>,
        start: usize,
        end: usize,
        chain: C,
        pool: BufferPool,
        options: SortOptions,
        source: S,
    ) -> Self {
        Self {
            state,
            keys,
            ready: false,
            pos: 0,
            start,
            end,
            chain,
            pool,
            options,
            source,
        }
    }

    /// Raise the lower bound. Skipping past the upper bound empties the window.
    pub fn skip(mut self, n: usize) -> Self {
        self.start = self.start.saturating_add(n);
        self
    }

    /// Lower the upper bound.
    pub fn take(mut self, n: usize) -> Self {
        self.end = self.end.min(self.start.saturating_add(n));
        self
    }

    fn window_len(&self, n: usize) -> usize {
        self.end.min(n).saturating_sub(self.start)
    }

    fn ensure_ready(&mut self) -> Result<()> {
        self.state.check()?;
        if self.ready {
            return Ok(());
        }
        match self.state {
            OrderState::Released | OrderState::Failed(_) => return Ok(()),
            OrderState::Sorted(_) => {
                self.ready = true;
                return Ok(());
            }
            OrderState::Pending => {
                let empty = self.start >= self.end
                    || self.source.try_get_count().is_some_and(|n| self.start >= n);
                if empty {
                    self.state = OrderState::Sorted(self.pool.lease(0, "order_by.buffer")?);
                    self.ready = true;
                    return Ok(());
                }
                match drain(&mut self.source, &self.pool, "order_by.buffer") {
                    Ok(items) => self.state = OrderState::Drained { items, map: None },
                    Err(e) => return Err(self.state.fail(e)),
                }
            }
            OrderState::Drained { .. } => {}
        }

        if let OrderState::Drained { items, map } = &mut self.state {
            let n = items.len();
            let hi = self.end.min(n);
            // Without a map reads are in source order, which is already
            // ordered for a single element and unused for an empty window.
            if self.start < hi && n > 1 {
                if self.keys.is_none() {
                    self.keys = Some(self.chain.extract_keys(items, &self.pool)?);
                }
                if map.is_none() {
                    *map = Some(self.pool.lease_identity(n, "order_by.map")?);
                }
                if let (Some(keys), Some(map)) = (&self.keys, map.as_deref_mut()) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(strategy = "partial_sort", n, start = self.start, end = hi, "ordering");
                    let items = &items[..];
                    let chain = &self.chain;
                    let cmp = |a: usize, b: usize| index_order(chain, items, keys, a, b);
                    partial_sort(map, self.start, hi - 1, self.options.small_sort_threshold, &cmp);
                }
            }
        }
        self.ready = true;
        Ok(())
    }

    /// Element at ordered position `i`; valid once ready.
    fn item_at(&self, i: usize) -> Option<&S::Item> {
        match &self.state {
            OrderState::Sorted(items) => items.get(i),
            OrderState::Drained {
                items,
                map: Some(map),
            } => map.get(i).and_then(|&j| items.get(j)),
            OrderState::Drained { items, map: None } => items.get(i),
            _ => None,
        }
    }
}

impl<S, C> Stage for OrderBySkipTake<S, C>
where
    S: Stage,
    S::Item: Clone,
    C: KeyChain<S::Item>,
{
    type Item = S::Item;

    fn try_get_count(&self) -> Option<usize> {
        let n = match self.state {
            OrderState::Pending => self.source.try_get_count()?,
            ref state => state.materialized_len()?,
        };
        Some(self.window_len(n))
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
        self.ensure_ready()?;
        let Some(n) = self.state.materialized_len() else {
            return Ok(false);
        };
        let Some(range) = copy_window(self.window_len(n), offset, len) else {
            return Ok(false);
        };
        dest.reserve(range.len());
        for p in range {
            if let Some(v) = self.item_at(self.start + p) {
                dest.push(v.clone());
            }
        }
        Ok(true)
    }

    fn try_pull_next(&mut self) -> Result<Option<S::Item>> {
        self.ensure_ready()?;
        let Some(n) = self.state.materialized_len() else {
            return Ok(None);
        };
        if self.pos >= self.window_len(n) {
            return Ok(None);
        }
        let next = self.item_at(self.start + self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        Ok(next)
    }

    fn release(&mut self) {
        self.state = OrderState::Released;
        self.keys = None;
        self.ready = false;
        self.source.release();
    }
}
