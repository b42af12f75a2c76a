//! `skip` / `take` composition.
//!
//! Plain stages wrap themselves in [`Skip`] / [`Take`]. Ordering stages turn a
//! window into an [`OrderBySkipTake`] instead, so that only the requested
//! range of the ordered sequence is ever sorted.

use std::any::Any;

use pullseq_core::{EqualityComparer, Stage};

use crate::append::Append;
use crate::default_if_empty::DefaultIfEmpty;
use crate::of_type::OfType;
use crate::order::{KeyChain, OrderBy, OrderBySkipTake};
use crate::reverse::Reverse;
use crate::set::{Distinct, Except, Union};
use crate::skip::Skip;
use crate::source::{FromIter, FromRange, FromSlice, FromVec};
use crate::take::Take;

pub trait Window: Stage + Sized {
    type Skipped: Stage<Item = Self::Item>;
    type Taken: Stage<Item = Self::Item>;

    fn skip(self, n: usize) -> Self::Skipped;
    fn take(self, n: usize) -> Self::Taken;
}

macro_rules! plain_window {
    ($(impl[$($g:tt)*] $ty:ty $(where [$($w:tt)*])?;)*) => {$(
        impl<$($g)*> Window for $ty $(where $($w)*)? {
            type Skipped = Skip<Self>;
            type Taken = Take<Self>;

            fn skip(self, n: usize) -> Skip<Self> {
                Skip::new(self, n)
            }

            fn take(self, n: usize) -> Take<Self> {
                Take::new(self, n)
            }
        }
    )*};
}

plain_window! {
    impl[T: Clone] FromVec<T>;
    impl['a, T: Clone] FromSlice<'a, T>;
    impl[] FromRange;
    impl[I: Iterator] FromIter<I>;
    impl[S: Stage] Skip<S>;
    impl[S: Stage] Take<S>;
    impl[S: Stage] Append<S> where [S::Item: Clone];
    impl[S: Stage] Reverse<S> where [S::Item: Clone];
    impl[S: Stage] DefaultIfEmpty<S> where [S::Item: Clone];
    impl[S: Stage<Item = Box<dyn Any>>, R: 'static] OfType<S, R>;
    impl[S: Stage, C: EqualityComparer<S::Item>] Distinct<S, C> where [S::Item: Clone];
    impl[S1: Stage, S2: Stage<Item = S1::Item>, C: EqualityComparer<S1::Item>] Except<S1, S2, C>
        where [S1::Item: Clone];
    impl[S1: Stage, S2: Stage<Item = S1::Item>, C: EqualityComparer<S1::Item>] Union<S1, S2, C>
        where [S1::Item: Clone];
}

impl<S, C> Window for OrderBy<S, C>
where
    S: Stage,
    S::Item: Clone,
    C: KeyChain<S::Item>,
{
    type Skipped = OrderBySkipTake<S, C>;
    type Taken = OrderBySkipTake<S, C>;

    fn skip(self, n: usize) -> OrderBySkipTake<S, C> {
        self.into_window(n, usize::MAX)
    }

    fn take(self, n: usize) -> OrderBySkipTake<S, C> {
        self.into_window(0, n)
    }
}

impl<S, C> Window for OrderBySkipTake<S, C>
where
    S: Stage,
    S::Item: Clone,
    C: KeyChain<S::Item>,
{
    type Skipped = Self;
    type Taken = Self;

    fn skip(self, n: usize) -> Self {
        OrderBySkipTake::skip(self, n)
    }

    fn take(self, n: usize) -> Self {
        OrderBySkipTake::take(self, n)
    }
}
