// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Balanced pairwise reduction
//!
//! Combining many operands one after another builds a chain whose
//! intermediates grow with every step. Reducing in rounds pairs items of
//! similar size instead: `n` items take `n - 1` combinations arranged in a
//! tree of depth `ceil(log2 n)`.

use std::convert::Infallible;

/// Reduce `items` with `op` in balanced rounds
///
/// Each round combines neighbours front to back, the earlier item always on
/// the left, and carries an odd trailing item to the end of the next round.
/// For an associative `op` the result equals a left fold even when `op` is
/// not commutative. Returns `None` for empty input; a single item is
/// returned as is without calling `op`.
///
/// ```
/// use polyframe_boolean::cascade::reduce_cascade;
///
/// let word = reduce_cascade(["a", "b", "c"].map(String::from), |l, r| l + &r);
/// assert_eq!(word.as_deref(), Some("abc"));
/// assert_eq!(reduce_cascade(Vec::<u32>::new(), |l, r| l + r), None);
/// ```
pub fn reduce_cascade<T, F>(items: impl IntoIterator<Item = T>, mut op: F) -> Option<T>
where
    F: FnMut(T, T) -> T,
{
    match try_reduce_cascade(items, |left, right| Ok::<T, Infallible>(op(left, right))) {
        Ok(result) => result,
        Err(never) => match never {},
    }
}

/// Fallible form of [`reduce_cascade`]; the first error aborts the reduction
pub fn try_reduce_cascade<T, E, F>(
    items: impl IntoIterator<Item = T>,
    mut op: F,
) -> Result<Option<T>, E>
where
    F: FnMut(T, T) -> Result<T, E>,
{
    let mut pending: Vec<T> = items.into_iter().collect();

    while pending.len() > 1 {
        let mut next = Vec::with_capacity(pending.len().div_ceil(2));
        let mut round = pending.into_iter();
        while let Some(left) = round.next() {
            match round.next() {
                Some(right) => next.push(op(left, right)?),
                None => next.push(left),
            }
        }
        pending = next;
    }

    Ok(pending.pop())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_matches_fold_for_sums_and_products() {
        for n in 1..20u64 {
            let items: Vec<u64> = (1..=n).collect();
            assert_eq!(
                reduce_cascade(items.clone(), |a, b| a + b),
                items.iter().copied().reduce(|a, b| a + b)
            );
            assert_eq!(
                reduce_cascade(items.clone(), |a, b| a * b),
                items.iter().copied().reduce(|a, b| a * b)
            );
        }
    }

    #[test]
    fn test_keeps_order_for_concatenation() {
        let letters = "abcdefg".chars().map(String::from);
        assert_eq!(
            reduce_cascade(letters, |l, r| l + &r).as_deref(),
            Some("abcdefg")
        );
    }

    #[test]
    fn test_pairing_structure() {
        let letters = "abcdefg".chars().map(String::from);
        let tree = reduce_cascade(letters, |l, r| format!("({l}{r})"));
        assert_eq!(tree.as_deref(), Some("(((ab)(cd))((ef)g))"));
    }

    #[test]
    fn test_empty_is_none_not_zero() {
        assert_eq!(reduce_cascade(Vec::<i32>::new(), |a, b| a + b), None);
        assert_eq!(reduce_cascade(vec![0], |a, b| a + b), Some(0));
    }

    #[test]
    fn test_single_item_skips_op() {
        let mut calls = 0;
        let result = reduce_cascade(vec!["only".to_string()], |l, r| {
            calls += 1;
            l + &r
        });
        assert_eq!(result.as_deref(), Some("only"));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_call_count_and_depth() {
        for n in 1..=100usize {
            let mut calls = 0;
            let (_, depth) = reduce_cascade((0..n).map(|i| (i, 0u32)), |l, r| {
                calls += 1;
                (l.0 + r.0, l.1.max(r.1) + 1)
            })
            .unwrap();

            assert_eq!(calls, n - 1);
            assert_eq!(depth, n.next_power_of_two().trailing_zeros());
        }
    }

    #[test]
    fn test_first_error_aborts() {
        let mut calls = 0;
        let result: Result<Option<i32>, String> = try_reduce_cascade(1..=8, |a, b| {
            calls += 1;
            if b == 4 {
                Err(format!("cannot combine {a} and {b}"))
            } else {
                Ok(a + b)
            }
        });

        assert_eq!(result, Err("cannot combine 3 and 4".to_string()));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_random_sequences_match_fold() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let len = rng.gen_range(1..64);
            let words: Vec<String> = (0..len)
                .map(|_| {
                    let size = rng.gen_range(0..4);
                    (0..size).map(|_| rng.gen_range('a'..='z')).collect()
                })
                .collect();
            let numbers: Vec<i64> = (0..len).map(|_| rng.gen_range(-1000..1000)).collect();

            assert_eq!(reduce_cascade(words.clone(), |l, r| l + &r), Some(words.concat()));
            assert_eq!(
                reduce_cascade(numbers.clone(), |a, b| a + b),
                Some(numbers.iter().sum())
            );
        }
    }
}
