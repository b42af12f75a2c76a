use pullseq_core::stage::copy_from_slice;
use pullseq_core::{Comparer, Natural, Offset, Result, SortOptions, Stage};
use pullseq_mem::BufferPool;

use super::chain::{ByKey, KeyChain, Then};
use super::select::{max_index, min_index, quick_select};
use super::skip_take::OrderBySkipTake;
use super::{index_order, sort_in_place, OrderState};
use crate::drain::drain;

/// Stable ordering of the upstream by a key chain.
///
/// Nothing is read until the first access. Pulls, views and multi-element
/// copies fully sort a drained buffer once; single-element copies select
/// without sorting. A failed materialization leaves the stage released.
pub struct OrderBy<S: Stage, C: KeyChain<S::Item>> {
    state: OrderState<S::Item>,
    keys: Option<C::Keys>,
    pos: usize,
    chain: C,
    pool: BufferPool,
    options: SortOptions,
    source: S,
}

impl<S, C> OrderBy<S, C>
where
    S: Stage,
    S::Item: Clone,
    C: KeyChain<S::Item>,
{
    pub fn new(source: S, chain: C, pool: BufferPool, options: SortOptions) -> Self {
        Self {
            state: OrderState::Pending,
            keys: None,
            pos: 0,
            chain,
            pool,
            options,
            source,
        }
    }

    pub fn then_by<K, F>(self, selector: F) -> OrderBy<S, Then<C, ByKey<F, K, Natural>>>
    where
        F: Fn(&S::Item) -> K,
        K: Ord,
    {
        self.push_level(ByKey::new(selector, Natural, false))
    }

    pub fn then_by_descending<K, F>(
        self,
        selector: F,
    ) -> OrderBy<S, Then<C, ByKey<F, K, Natural>>>
    where
        F: Fn(&S::Item) -> K,
        K: Ord,
    {
        self.push_level(ByKey::new(selector, Natural, true))
    }

    pub fn then_by_with<K, F, Cmp>(
        self,
        selector: F,
        comparer: Cmp,
    ) -> OrderBy<S, Then<C, ByKey<F, K, Cmp>>>
    where
        F: Fn(&S::Item) -> K,
        Cmp: Comparer<K>,
    {
        self.push_level(ByKey::new(selector, comparer, false))
    }

    pub fn then_by_descending_with<K, F, Cmp>(
        self,
        selector: F,
        comparer: Cmp,
    ) -> OrderBy<S, Then<C, ByKey<F, K, Cmp>>>
    where
        F: Fn(&S::Item) -> K,
        Cmp: Comparer<K>,
    {
        self.push_level(ByKey::new(selector, comparer, true))
    }

    /// Same upstream, chain extended by one level. Extracted keys belong to
    /// the old chain and are dropped; a sorted buffer is re-sorted on demand
    /// and reading restarts from the first element.
    fn push_level<L: KeyChain<S::Item>>(self, level: L) -> OrderBy<S, Then<C, L>> {
        let OrderBy {
            state,
            keys: _,
            pos: _,
            chain,
            pool,
            options,
            source,
        } = self;
        let state = match state {
            OrderState::Sorted(items) => OrderState::Drained { items, map: None },
            other => other,
        };
        OrderBy {
            state,
            keys: None,
            pos: 0,
            chain: Then::new(chain, level),
            pool,
            options,
            source,
        }
    }

    /// Restrict to positions `start..end` of the ordered sequence.
    pub(crate) fn into_window(self, start: usize, end: usize) -> OrderBySkipTake<S, C> {
        let OrderBy {
            state,
            keys,
            pos: _,
            chain,
            pool,
            options,
            source,
        } = self;
        OrderBySkipTake::from_parts(state, keys, start, end, chain, pool, options, source)
    }

    fn ensure_drained(&mut self) -> Result<()> {
        self.state.check()?;
        if let OrderState::Pending = self.state {
            let items = match drain(&mut self.source, &self.pool, "order_by.buffer") {
                Ok(items) => items,
                Err(e) => return Err(self.state.fail(e)),
            };
            self.state = if items.len() <= 1 {
                OrderState::Sorted(items)
            } else {
                OrderState::Drained { items, map: None }
            };
        }
        Ok(())
    }

    fn ensure_sorted(&mut self) -> Result<()> {
        self.ensure_drained()?;
        if let OrderState::Drained { .. } = self.state {
            if let OrderState::Drained { mut items, map } =
                std::mem::replace(&mut self.state, OrderState::Pending)
            {
                #[cfg(feature = "tracing")]
                tracing::debug!(strategy = "full_sort", n = items.len(), "ordering");
                let keys = self.keys.take();
                match sort_in_place(&mut items[..], keys, map, &self.chain, &self.pool) {
                    Ok(()) => self.state = OrderState::Sorted(items),
                    Err(e) => return Err(self.state.fail(e)),
                }
            }
        }
        Ok(())
    }

    /// Whole-sequence copy: let upstream fill `dest`, then sort that slice.
    fn sort_upstream_copy(&mut self, dest: &mut Vec<S::Item>, n: usize) -> Result<bool> {
        let mark = dest.len();
        if !self.source.try_bulk_copy(dest, Offset::Start(0), n)? {
            return Ok(false);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(strategy = "sort_in_dest", n, "ordering");
        if let Err(e) = sort_in_place(&mut dest[mark..], None, None, &self.chain, &self.pool) {
            dest.truncate(mark);
            return Err(e);
        }
        Ok(true)
    }

    /// Single-element read without sorting.
    fn select_into(&mut self, dest: &mut Vec<S::Item>, offset: Offset) -> Result<bool> {
        self.ensure_drained()?;
        let n = match &self.state {
            OrderState::Sorted(items) => return Ok(copy_from_slice(items, dest, offset, 1)),
            OrderState::Drained { items, .. } => items.len(),
            OrderState::Pending | OrderState::Failed(_) | OrderState::Released => {
                return Ok(false)
            }
        };
        let Some(k) = offset.resolve(n).filter(|&k| k < n) else {
            self.ensure_sorted()?;
            return Ok(match &self.state {
                OrderState::Sorted(items) => copy_from_slice(items, dest, offset, 1),
                _ => false,
            });
        };

        if self.keys.is_none() {
            if let OrderState::Drained { items, .. } = &self.state {
                self.keys = Some(self.chain.extract_keys(items, &self.pool)?);
            }
        }
        let (OrderState::Drained { items, map }, Some(keys)) = (&mut self.state, &self.keys)
        else {
            return Ok(false);
        };
        let items = &items[..];
        let chain = &self.chain;
        let cmp = |a: usize, b: usize| index_order(chain, items, keys, a, b);

        let picked = if k == 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(strategy = "min_scan", n, "ordering");
            min_index(n, &cmp)
        } else if k == n - 1 {
            #[cfg(feature = "tracing")]
            tracing::debug!(strategy = "max_scan", n, "ordering");
            max_index(n, &cmp)
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(strategy = "quickselect", n, k, "ordering");
            if map.is_none() {
                *map = Some(self.pool.lease_identity(n, "order_by.map")?);
            }
            let threshold = self.options.small_sort_threshold;
            map.as_deref_mut()
                .map(|map| quick_select(map, k, threshold, &cmp))
        };

        match picked {
            Some(idx) => {
                dest.push(items[idx].clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<S, C> Stage for OrderBy<S, C>
where
    S: Stage,
    S::Item: Clone,
    C: KeyChain<S::Item>,
{
    type Item = S::Item;

    fn try_get_count(&self) -> Option<usize> {
        match self.state {
            OrderState::Pending => self.source.try_get_count(),
            ref state => state.materialized_len(),
        }
    }

    /// Only once fully sorted; asking for the view never sorts.
    fn try_get_view(&self) -> Option<&[S::Item]> {
        match &self.state {
            OrderState::Sorted(items) => Some(&items[..]),
            _ => None,
        }
    }

    fn try_bulk_copy(
        &mut self,
        dest: &mut Vec<S::Item>,
        offset: Offset,
        len: usize,
    ) -> Result<bool> {
        match &self.state {
            OrderState::Released => return Ok(false),
            OrderState::Failed(e) => return Err(e.clone()),
            OrderState::Sorted(items) => return Ok(copy_from_slice(items, dest, offset, len)),
            OrderState::Pending | OrderState::Drained { .. } => {}
        }
        if len == 0 {
            match offset {
                Offset::Start(_) => return Ok(true),
                Offset::End(k) => {
                    if let Some(n) = self.try_get_count() {
                        return Ok(k <= n);
                    }
                }
            }
        }
        if len == 1 {
            return self.select_into(dest, offset);
        }
        if let OrderState::Pending = self.state {
            if let Some(n) = self.source.try_get_count() {
                if offset.resolve(n) == Some(0) && len >= n && self.sort_upstream_copy(dest, n)? {
                    return Ok(true);
                }
            }
        }
        self.ensure_sorted()?;
        Ok(match &self.state {
            OrderState::Sorted(items) => copy_from_slice(items, dest, offset, len),
            _ => false,
        })
    }

    fn try_pull_next(&mut self) -> Result<Option<S::Item>> {
        self.ensure_sorted()?;
        let OrderState::Sorted(items) = &self.state else {
            return Ok(None);
        };
        let next = items.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        Ok(next)
    }

    fn release(&mut self) {
        self.state = OrderState::Released;
        self.keys = None;
        self.source.release();
    }
}
