//! Partition-based sorting and selection over index maps.
//!
//! `cmp` must be a strict total order on the indices (the key chain plus the
//! index tie-break gives one). All ranges are half-open unless noted.

use std::cmp::Ordering;

pub fn insertion_sort<F>(v: &mut [usize], cmp: &F)
where
    F: Fn(usize, usize) -> Ordering,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && cmp(v[j - 1], v[j]) == Ordering::Greater {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Hoare partition of `v[lo..hi]` around a median-of-three pivot.
///
/// Requires `hi - lo >= 2`. Returns `j` with `lo <= j < hi - 1` such that
/// every element of `v[lo..=j]` is `<=` the pivot and every element of
/// `v[j + 1..hi]` is `>=` it. Both sides are non-empty.
pub fn hoare_partition<F>(v: &mut [usize], lo: usize, hi: usize, cmp: &F) -> usize
where
    F: Fn(usize, usize) -> Ordering,
{
    let (a, m, b) = (lo, lo + (hi - lo - 1) / 2, hi - 1);
    if cmp(v[m], v[a]) == Ordering::Less {
        v.swap(a, m);
    }
    if cmp(v[b], v[a]) == Ordering::Less {
        v.swap(a, b);
    }
    if cmp(v[b], v[m]) == Ordering::Less {
        v.swap(m, b);
    }
    let pivot = v[m];

    let mut i = lo;
    let mut j = hi - 1;
    loop {
        while cmp(v[i], pivot) == Ordering::Less {
            i += 1;
        }
        while cmp(v[j], pivot) == Ordering::Greater {
            j -= 1;
        }
        if i >= j {
            return j;
        }
        v.swap(i, j);
        i += 1;
        j -= 1;
    }
}

/// Order only positions `min..=max` of `v`.
///
/// After return `v[min..=max]` holds exactly what a full sort would put
/// there; everything else is a permutation of the remaining elements.
/// Partitions that cannot overlap the window are never visited, and
/// partitions of at most `threshold` elements are insertion sorted.
pub fn partial_sort<F>(v: &mut [usize], min: usize, max: usize, threshold: usize, cmp: &F)
where
    F: Fn(usize, usize) -> Ordering,
{
    if v.is_empty() || min > max || min >= v.len() {
        return;
    }
    let max = max.min(v.len() - 1);
    partial_sort_range(v, 0, v.len(), min, max, threshold.max(1), cmp);
}

// Invariant: `lo..hi` overlaps `min..=max`.
fn partial_sort_range<F>(
    v: &mut [usize],
    mut lo: usize,
    mut hi: usize,
    min: usize,
    max: usize,
    threshold: usize,
    cmp: &F,
) where
    F: Fn(usize, usize) -> Ordering,
{
    loop {
        if hi - lo <= 1 {
            return;
        }
        if hi - lo <= threshold {
            insertion_sort(&mut v[lo..hi], cmp);
            return;
        }
        let j = hoare_partition(v, lo, hi, cmp);
        let left = min <= j;
        let right = max > j;
        match (left, right) {
            (true, true) => {
                // Recurse into the smaller side, iterate on the larger.
                if j + 1 - lo < hi - (j + 1) {
                    partial_sort_range(v, lo, j + 1, min, max, threshold, cmp);
                    lo = j + 1;
                } else {
                    partial_sort_range(v, j + 1, hi, min, max, threshold, cmp);
                    hi = j + 1;
                }
            }
            (true, false) => hi = j + 1,
            (false, true) => lo = j + 1,
            (false, false) => return,
        }
    }
}

/// Element of rank `k` (0-based) in the order `cmp`. Requires `k < v.len()`.
///
/// Partitions `v` in place; afterwards `v[k]` is the ranked element.
pub fn quick_select<F>(v: &mut [usize], k: usize, threshold: usize, cmp: &F) -> usize
where
    F: Fn(usize, usize) -> Ordering,
{
    let threshold = threshold.max(1);
    let (mut lo, mut hi) = (0, v.len());
    loop {
        if hi - lo <= threshold {
            insertion_sort(&mut v[lo..hi], cmp);
            return v[k];
        }
        let j = hoare_partition(v, lo, hi, cmp);
        if k <= j {
            hi = j + 1;
        } else {
            lo = j + 1;
        }
    }
}

/// Index in `0..n` that sorts first. `None` when `n == 0`.
pub fn min_index<F>(n: usize, cmp: &F) -> Option<usize>
where
    F: Fn(usize, usize) -> Ordering,
{
    if n == 0 {
        return None;
    }
    let mut best = 0;
    for i in 1..n {
        if cmp(i, best) == Ordering::Less {
            best = i;
        }
    }
    Some(best)
}

/// Index in `0..n` that sorts last. `None` when `n == 0`.
pub fn max_index<F>(n: usize, cmp: &F) -> Option<usize>
where
    F: Fn(usize, usize) -> Ordering,
{
    if n == 0 {
        return None;
    }
    let mut best = 0;
    for i in 1..n {
        if cmp(i, best) != Ordering::Less {
            best = i;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn by_data(data: &[i32]) -> impl Fn(usize, usize) -> Ordering + '_ {
        move |a, b| data[a].cmp(&data[b]).then(a.cmp(&b))
    }

    fn sorted_map(data: &[i32]) -> Vec<usize> {
        let mut map: Vec<usize> = (0..data.len()).collect();
        map.sort_by(|&a, &b| by_data(data)(a, b));
        map
    }

    fn random_data(rng: &mut StdRng, n: usize) -> Vec<i32> {
        (0..n).map(|_| rng.gen_range(0..20)).collect()
    }

    #[test]
    fn partition_splits_around_pivot() {
        let data = [5, 3, 9, 1, 7, 3, 8, 2];
        let cmp = by_data(&data);
        let mut v: Vec<usize> = (0..data.len()).collect();
        let j = hoare_partition(&mut v, 0, data.len(), &cmp);
        assert!(j < data.len() - 1);
        let left_max = v[..=j].iter().map(|&i| (data[i], i)).max().unwrap();
        let right_min = v[j + 1..].iter().map(|&i| (data[i], i)).min().unwrap();
        assert!(left_max < right_min);
    }

    #[test]
    fn partial_sort_orders_the_window() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [0usize, 1, 2, 5, 17, 64, 200] {
            let data = random_data(&mut rng, n);
            let expected = sorted_map(&data);
            for _ in 0..10 {
                let min = rng.gen_range(0..=n);
                let max = rng.gen_range(min..=n + 1);
                let mut v: Vec<usize> = (0..n).collect();
                partial_sort(&mut v, min, max, 4, &by_data(&data));
                let hi = (max + 1).min(n);
                if min < hi {
                    assert_eq!(&v[min..hi], &expected[min..hi], "n={n} min={min} max={max}");
                }
            }
        }
    }

    #[test]
    fn select_finds_every_rank() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in [1usize, 2, 3, 16, 33, 120] {
            let data = random_data(&mut rng, n);
            let expected = sorted_map(&data);
            for k in 0..n {
                let mut v: Vec<usize> = (0..n).collect();
                assert_eq!(quick_select(&mut v, k, 3, &by_data(&data)), expected[k]);
            }
        }
    }

    #[test]
    fn min_and_max_respect_ties() {
        let data = [2, 1, 3, 1, 3];
        let cmp = by_data(&data);
        assert_eq!(min_index(data.len(), &cmp), Some(1));
        assert_eq!(max_index(data.len(), &cmp), Some(4));
        assert_eq!(min_index(0, &cmp), None);
        assert_eq!(max_index(0, &cmp), None);
    }
}
