//! Caller-supplied ordering and equality.
//!
//! Both traits must be deterministic: the same inputs compare the same way on
//! every call, or sort/select/dedup results are unspecified.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Total order over keys of type `K`.
pub trait Comparer<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The host order (`Ord`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparer<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparer<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Inverts another comparer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparer<K>> Comparer<K> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Equality plus a hash consistent with it.
pub trait EqualityComparer<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;
    fn hash<H: Hasher>(&self, value: &T, state: &mut H);
}

/// The host equality (`Hash + Eq`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultEquality;

impl<T: Hash + Eq + ?Sized> EqualityComparer<T> for DefaultEquality {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    #[inline]
    fn hash<H: Hasher>(&self, value: &T, state: &mut H) {
        value.hash(state);
    }
}

/// Two values are equal when their projected keys are.
pub struct KeyEquality<F, K> {
    project: F,
    _key: PhantomData<fn() -> K>,
}

impl<F, K> KeyEquality<F, K> {
    pub fn new(project: F) -> Self {
        Self {
            project,
            _key: PhantomData,
        }
    }
}

impl<T: ?Sized, F, K> EqualityComparer<T> for KeyEquality<F, K>
where
    F: Fn(&T) -> K,
    K: Hash + Eq,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.project)(a) == (self.project)(b)
    }

    fn hash<H: Hasher>(&self, value: &T, state: &mut H) {
        (self.project)(value).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_with<T, C: EqualityComparer<T>>(c: &C, v: &T) -> u64 {
        let mut h = DefaultHasher::new();
        c.hash(v, &mut h);
        h.finish()
    }

    #[test]
    fn closures_are_comparers() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        assert_eq!(by_len.compare(&"abc", &"z"), Ordering::Greater);
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Reversed(Natural).compare(&1, &2), Ordering::Greater);
    }

    #[test]
    fn key_equality_hashes_the_projection() {
        let ci = KeyEquality::new(|s: &String| s.to_ascii_lowercase());
        let a = "Hello".to_string();
        let b = "hELLO".to_string();
        assert!(ci.equals(&a, &b));
        assert_eq!(hash_with(&ci, &a), hash_with(&ci, &b));
        assert!(!ci.equals(&a, &"world".to_string()));
    }
}
