//! Pipeline builder.

use std::any::Any;
use std::hash::Hash;
use std::ops::Range;

use once_cell::sync::Lazy;
use pullseq_core::{
    Comparer, DefaultEquality, EqualityComparer, Natural, Result, SeqConfig, SortOptions, Stage,
};
use pullseq_mem::{BufferPool, PoolStats};
use pullseq_operators::{
    Append, ByKey, ByValue, ByValueWith, DefaultIfEmpty, Distinct, Except, FromIter, FromRange,
    FromSlice, FromVec, KeyChain, OfType, OrderBy, Reverse, Then, Union, Window,
};

use crate::cursor::Cursor;

static ENV_SORT_OPTIONS: Lazy<SortOptions> = Lazy::new(|| SeqConfig::from_env().sort_options());

/// A lazy pipeline rooted at one stage.
///
/// Nothing runs until a terminal consumer or the [`Cursor`] pulls. Stages
/// that materialize lease from the pipeline's pool, which defaults to
/// [`BufferPool::global`].
pub struct Pipeline<S> {
    stage: S,
    pool: BufferPool,
    options: SortOptions,
}

impl<T: Clone> Pipeline<FromVec<T>> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Pipeline::new(FromVec::new(items))
    }
}

impl<'a, T: Clone> Pipeline<FromSlice<'a, T>> {
    pub fn from_slice(items: &'a [T]) -> Self {
        Pipeline::new(FromSlice::new(items))
    }
}

impl<I: Iterator> Pipeline<FromIter<I>> {
    /// Pull-only source over any iterator.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<II: IntoIterator<IntoIter = I>>(items: II) -> Self {
        Pipeline::new(FromIter::new(items))
    }
}

impl Pipeline<FromRange> {
    pub fn range(range: Range<i64>) -> Self {
        Pipeline::new(FromRange::new(range))
    }
}

impl<S: Stage> Pipeline<S> {
    pub fn new(stage: S) -> Self {
        Self {
            stage,
            pool: BufferPool::global(),
            options: *ENV_SORT_OPTIONS,
        }
    }

    pub fn with_pool(mut self, pool: BufferPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_sort_options(mut self, options: SortOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a private pool and sort options built from `cfg`.
    pub fn with_config(self, cfg: &SeqConfig) -> Result<Self> {
        let pool = BufferPool::from_config(cfg)?;
        Ok(self.with_pool(pool).with_sort_options(cfg.sort_options()))
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn into_stage(self) -> S {
        self.stage
    }

    /// Start consuming. The cursor releases the stage exactly once.
    pub fn cursor(self) -> Cursor<S> {
        Cursor::new(self.stage)
    }

    fn wrap<S2>(self, f: impl FnOnce(S, &BufferPool, SortOptions) -> S2) -> Pipeline<S2> {
        let Pipeline {
            stage,
            pool,
            options,
        } = self;
        let stage = f(stage, &pool, options);
        Pipeline {
            stage,
            pool,
            options,
        }
    }

    pub fn append(self, value: S::Item) -> Pipeline<Append<S>>
    where
        S::Item: Clone,
    {
        self.wrap(|s, _, _| Append::new(s, value))
    }

    pub fn skip(self, n: usize) -> Pipeline<S::Skipped>
    where
        S: Window,
    {
        self.wrap(|s, _, _| s.skip(n))
    }

    pub fn take(self, n: usize) -> Pipeline<S::Taken>
    where
        S: Window,
    {
        self.wrap(|s, _, _| s.take(n))
    }

    pub fn reverse(self) -> Pipeline<Reverse<S>>
    where
        S::Item: Clone,
    {
        self.wrap(|s, pool, _| Reverse::new(s, pool.clone()))
    }

    pub fn default_if_empty(self, default: S::Item) -> Pipeline<DefaultIfEmpty<S>>
    where
        S::Item: Clone,
    {
        self.wrap(|s, _, _| DefaultIfEmpty::new(s, default))
    }

    pub fn of_type<R: 'static>(self) -> Pipeline<OfType<S, R>>
    where
        S: Stage<Item = Box<dyn Any>>,
    {
        self.wrap(|s, _, _| OfType::new(s))
    }

    pub fn distinct(self) -> Pipeline<Distinct<S, DefaultEquality>>
    where
        S::Item: Clone + Hash + Eq,
    {
        self.distinct_by(DefaultEquality)
    }

    pub fn distinct_by<C>(self, comparer: C) -> Pipeline<Distinct<S, C>>
    where
        S::Item: Clone,
        C: EqualityComparer<S::Item>,
    {
        self.wrap(|s, _, _| Distinct::new(s, comparer))
    }

    /// Distinct elements not present in `other`. `other` keeps no pool of its
    /// own once merged.
    pub fn except<S2>(self, other: Pipeline<S2>) -> Pipeline<Except<S, S2, DefaultEquality>>
    where
        S::Item: Clone + Hash + Eq,
        S2: Stage<Item = S::Item>,
    {
        self.except_by(other, DefaultEquality)
    }

    pub fn except_by<S2, C>(self, other: Pipeline<S2>, comparer: C) -> Pipeline<Except<S, S2, C>>
    where
        S::Item: Clone,
        S2: Stage<Item = S::Item>,
        C: EqualityComparer<S::Item>,
    {
        let second = other.into_stage();
        self.wrap(|s, _, _| Except::new(s, second, comparer))
    }

    pub fn union<S2>(self, other: Pipeline<S2>) -> Pipeline<Union<S, S2, DefaultEquality>>
    where
        S::Item: Clone + Hash + Eq,
        S2: Stage<Item = S::Item>,
    {
        self.union_by(other, DefaultEquality)
    }

    pub fn union_by<S2, C>(self, other: Pipeline<S2>, comparer: C) -> Pipeline<Union<S, S2, C>>
    where
        S::Item: Clone,
        S2: Stage<Item = S::Item>,
        C: EqualityComparer<S::Item>,
    {
        let second = other.into_stage();
        self.wrap(|s, _, _| Union::new(s, second, comparer))
    }

    fn ordered<C: KeyChain<S::Item>>(self, chain: C) -> Pipeline<OrderBy<S, C>>
    where
        S::Item: Clone,
    {
        self.wrap(|s, pool, options| OrderBy::new(s, chain, pool.clone(), options))
    }

    pub fn order(self) -> Pipeline<OrderBy<S, ByValue>>
    where
        S::Item: Clone + Ord,
    {
        self.ordered(ByValue::ascending())
    }

    pub fn order_descending(self) -> Pipeline<OrderBy<S, ByValue>>
    where
        S::Item: Clone + Ord,
    {
        self.ordered(ByValue::descending())
    }

    pub fn order_with<C>(self, comparer: C) -> Pipeline<OrderBy<S, ByValueWith<C>>>
    where
        S::Item: Clone,
        C: Comparer<S::Item>,
    {
        self.ordered(ByValueWith::new(comparer, false))
    }

    pub fn order_descending_with<C>(self, comparer: C) -> Pipeline<OrderBy<S, ByValueWith<C>>>
    where
        S::Item: Clone,
        C: Comparer<S::Item>,
    {
        self.ordered(ByValueWith::new(comparer, true))
    }

    pub fn order_by<K, F>(self, selector: F) -> Pipeline<OrderBy<S, ByKey<F, K, Natural>>>
    where
        S::Item: Clone,
        F: Fn(&S::Item) -> K,
        K: Ord,
    {
        self.ordered(ByKey::new(selector, Natural, false))
    }

    pub fn order_by_descending<K, F>(
        self,
        selector: F,
    ) -> Pipeline<OrderBy<S, ByKey<F, K, Natural>>>
    where
        S::Item: Clone,
        F: Fn(&S::Item) -> K,
        K: Ord,
    {
        self.ordered(ByKey::new(selector, Natural, true))
    }

    pub fn order_by_with<K, F, C>(
        self,
        selector: F,
        comparer: C,
    ) -> Pipeline<OrderBy<S, ByKey<F, K, C>>>
    where
        S::Item: Clone,
        F: Fn(&S::Item) -> K,
        C: Comparer<K>,
    {
        self.ordered(ByKey::new(selector, comparer, false))
    }

    pub fn order_by_descending_with<K, F, C>(
        self,
        selector: F,
        comparer: C,
    ) -> Pipeline<OrderBy<S, ByKey<F, K, C>>>
    where
        S::Item: Clone,
        F: Fn(&S::Item) -> K,
        C: Comparer<K>,
    {
        self.ordered(ByKey::new(selector, comparer, true))
    }
}

impl<S, C> Pipeline<OrderBy<S, C>>
where
    S: Stage,
    S::Item: Clone,
    C: KeyChain<S::Item>,
{
    pub fn then_by<K, F>(self, selector: F) -> Pipeline<OrderBy<S, Then<C, ByKey<F, K, Natural>>>>
    where
        F: Fn(&S::Item) -> K,
        K: Ord,
    {
        self.wrap(|s, _, _| s.then_by(selector))
    }

    pub fn then_by_descending<K, F>(
        self,
        selector: F,
    ) -> Pipeline<OrderBy<S, Then<C, ByKey<F, K, Natural>>>>
    where
        F: Fn(&S::Item) -> K,
        K: Ord,
    {
        self.wrap(|s, _, _| s.then_by_descending(selector))
    }

    pub fn then_by_with<K, F, Cmp>(
        self,
        selector: F,
        comparer: Cmp,
    ) -> Pipeline<OrderBy<S, Then<C, ByKey<F, K, Cmp>>>>
    where
        F: Fn(&S::Item) -> K,
        Cmp: Comparer<K>,
    {
        self.wrap(|s, _, _| s.then_by_with(selector, comparer))
    }

    pub fn then_by_descending_with<K, F, Cmp>(
        self,
        selector: F,
        comparer: Cmp,
    ) -> Pipeline<OrderBy<S, Then<C, ByKey<F, K, Cmp>>>>
    where
        F: Fn(&S::Item) -> K,
        Cmp: Comparer<K>,
    {
        self.wrap(|s, _, _| s.then_by_descending_with(selector, comparer))
    }
}

impl<S: Stage> IntoIterator for Pipeline<S> {
    type Item = Result<S::Item>;
    type IntoIter = Cursor<S>;

    fn into_iter(self) -> Cursor<S> {
        self.cursor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<S: Stage>(p: Pipeline<S>) -> Vec<S::Item> {
        p.into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn combinators_compose() {
        let p = Pipeline::from_vec(vec![1, 2, 3]).append(4).skip(2);
        assert_eq!(p.stage().try_get_count(), Some(2));
        assert_eq!(collect(p), vec![3, 4]);
    }

    #[test]
    fn ordered_windows_use_the_ordering_stage() {
        let p = Pipeline::from_vec(vec![5, 1, 4, 2, 3])
            .with_pool(BufferPool::new(1 << 16))
            .order()
            .skip(1)
            .take(2);
        let _: &pullseq_operators::OrderBySkipTake<_, _> = p.stage();
        assert_eq!(collect(p), vec![2, 3]);
    }

    #[test]
    fn then_by_on_the_pipeline() {
        let p = Pipeline::from_vec(vec![(2, 'x'), (1, 'y'), (2, 'a')])
            .order_by(|p| p.0)
            .then_by(|p| p.1);
        assert_eq!(collect(p), vec![(1, 'y'), (2, 'a'), (2, 'x')]);
    }

    #[test]
    fn with_config_rejects_invalid_values() {
        let bad = SeqConfig {
            pool_cap_bytes: 0,
            ..SeqConfig::default()
        };
        assert!(Pipeline::from_vec(vec![1]).with_config(&bad).is_err());

        let cfg = SeqConfig {
            pool_cap_bytes: 4096,
            small_sort_threshold: 4,
        };
        let p = Pipeline::from_vec(vec![1]).with_config(&cfg).unwrap();
        assert_eq!(p.stats().capacity_bytes, 4096);
    }
}
