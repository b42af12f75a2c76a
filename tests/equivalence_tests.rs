//! Fast paths must agree with plain pulling for every stage shape.

mod common;

use std::any::Any;

use common::{assert_equivalent, pool, random_vec, rng};
use pullseq::prelude::*;

const MAX_LEN: usize = 24;

fn data(len: usize) -> Vec<i32> {
    random_vec(&mut rng(len as u64), len, 8)
}

#[test]
fn test_sources() {
    for len in 0..MAX_LEN {
        let items = data(len);
        assert_equivalent(|| Pipeline::from_vec(items.clone()).into_stage(), &items[..]);
        assert_equivalent(|| Pipeline::from_slice(&items[..]).into_stage(), &items[..]);
        assert_equivalent(|| Pipeline::from_iter(items.clone()).into_stage(), &items[..]);

        let range: Vec<i64> = (0..len as i64).collect();
        assert_equivalent(|| Pipeline::range(0..len as i64).into_stage(), &range[..]);
    }
}

#[test]
fn test_skip_take_append() {
    for len in 0..MAX_LEN {
        let items = data(len);
        for n in [0, 1, 3, len, len + 2] {
            let skipped: Vec<i32> = items.iter().copied().skip(n).collect();
            let taken: Vec<i32> = items.iter().copied().take(n).collect();
            assert_equivalent(|| Pipeline::from_vec(items.clone()).skip(n).into_stage(), &skipped[..]);
            assert_equivalent(|| Pipeline::from_iter(items.clone()).skip(n).into_stage(), &skipped[..]);
            assert_equivalent(|| Pipeline::from_vec(items.clone()).take(n).into_stage(), &taken[..]);
            assert_equivalent(|| Pipeline::from_iter(items.clone()).take(n).into_stage(), &taken[..]);

            let mut appended = skipped.clone();
            appended.push(-1);
            assert_equivalent(
                || Pipeline::from_vec(items.clone()).skip(n).append(-1).into_stage(),
                &appended[..],
            );
        }
    }
}

#[test]
fn test_reverse_and_default_if_empty() {
    for len in 0..MAX_LEN {
        let items = data(len);
        let reversed: Vec<i32> = items.iter().rev().copied().collect();
        assert_equivalent(
            || Pipeline::from_vec(items.clone()).with_pool(pool()).reverse().into_stage(),
            &reversed[..],
        );
        assert_equivalent(
            || Pipeline::from_iter(items.clone()).with_pool(pool()).reverse().into_stage(),
            &reversed[..],
        );

        let defaulted = if items.is_empty() { vec![42] } else { items.clone() };
        assert_equivalent(
            || Pipeline::from_vec(items.clone()).default_if_empty(42).into_stage(),
            &defaulted[..],
        );
        assert_equivalent(
            || Pipeline::from_iter(items.clone()).default_if_empty(42).into_stage(),
            &defaulted[..],
        );
    }
}

#[test]
fn test_set_stages() {
    for len in 0..MAX_LEN {
        let items = data(len);
        let other = data(len / 2 + 1);

        let mut seen = Vec::new();
        for v in &items[..] {
            if !seen.contains(v) {
                seen.push(*v);
            }
        }
        assert_equivalent(|| Pipeline::from_vec(items.clone()).distinct().into_stage(), &seen[..]);

        let except: Vec<i32> = seen.iter().copied().filter(|v| !other.contains(v)).collect();
        assert_equivalent(
            || {
                Pipeline::from_vec(items.clone())
                    .except(Pipeline::from_vec(other.clone()))
                    .into_stage()
            },
            &except[..],
        );

        let mut union = seen.clone();
        for v in &other {
            if !union.contains(v) {
                union.push(*v);
            }
        }
        assert_equivalent(
            || {
                Pipeline::from_vec(items.clone())
                    .union(Pipeline::from_iter(other.clone()))
                    .into_stage()
            },
            &union[..],
        );
    }
}

#[test]
fn test_of_type() {
    for len in 0..MAX_LEN {
        let items = data(len);
        // Multiples of three become strings; boxes are rebuilt per stage.
        let boxed = || -> Vec<Box<dyn Any>> {
            items
                .iter()
                .map(|&v| -> Box<dyn Any> {
                    if v % 3 == 0 {
                        Box::new(v.to_string())
                    } else {
                        Box::new(v)
                    }
                })
                .collect()
        };
        let ints: Vec<i32> = items.iter().copied().filter(|v| v % 3 != 0).collect();
        let strings: Vec<String> = items
            .iter()
            .filter(|v| *v % 3 == 0)
            .map(|v| v.to_string())
            .collect();

        assert_equivalent(|| Pipeline::from_iter(boxed()).of_type::<i32>().into_stage(), &ints[..]);
        assert_equivalent(
            || Pipeline::from_iter(boxed()).of_type::<String>().into_stage(),
            &strings[..],
        );
        assert_equivalent(|| Pipeline::from_iter(boxed()).of_type::<u8>().into_stage(), &[][..]);

        let mut sorted = ints.clone();
        sorted.sort();
        let tail: Vec<i32> = sorted.iter().copied().skip(1).collect();
        assert_equivalent(
            || {
                Pipeline::from_iter(boxed())
                    .with_pool(pool())
                    .of_type::<i32>()
                    .order()
                    .skip(1)
                    .into_stage()
            },
            &tail[..],
        );
    }
}

#[test]
fn test_ordering_stages() {
    for len in 0..MAX_LEN {
        let items = data(len);
        let mut sorted = items.clone();
        sorted.sort();
        let mut descending = items.clone();
        descending.sort_by(|a, b| b.cmp(a));

        assert_equivalent(
            || Pipeline::from_vec(items.clone()).with_pool(pool()).order().into_stage(),
            &sorted[..],
        );
        assert_equivalent(
            || Pipeline::from_iter(items.clone()).with_pool(pool()).order_descending().into_stage(),
            &descending[..],
        );
        assert_equivalent(
            || {
                Pipeline::from_vec(items.clone())
                    .with_pool(pool())
                    .order_by(|v| -*v)
                    .into_stage()
            },
            &descending[..],
        );

        for (s, t) in [(0, 1), (1, 3), (len / 2, len), (len, 2)] {
            let window: Vec<i32> = sorted.iter().copied().skip(s).take(t).collect();
            assert_equivalent(
                || {
                    Pipeline::from_vec(items.clone())
                        .with_pool(pool())
                        .order()
                        .skip(s)
                        .take(t)
                        .into_stage()
                },
                &window[..],
            );
        }
    }
}

#[test]
fn test_composition_examples() {
    let p = Pipeline::from_vec(vec![1, 2, 3]).append(4).skip(2);
    assert_eq!(p.to_vec().unwrap(), vec![3, 4]);

    let p = Pipeline::from_vec(vec![1, 2, 3]).skip(10);
    assert_eq!(p.to_vec().unwrap(), Vec::<i32>::new());

    let p = Pipeline::from_vec(vec![1, 2, 3]).skip(10);
    assert_eq!(p.count().unwrap(), 0);
}
