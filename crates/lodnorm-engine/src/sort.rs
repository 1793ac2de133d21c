//! Result ordering by a configured sort field.
//!
//! The comparator mixes numeric and lexicographic comparison, so it is not
//! guaranteed to be transitive across a whole result set (`"10"`, `"9"` and
//! `"9a"` form a cycle). The slice sorts in `std` may panic on such
//! comparators, so ordering uses a plain stable merge sort that never does.

use std::cmp::Ordering;

/// Compare two sort keys. `None` is a record without the sort field.
#[must_use]
pub fn compare_sort_keys(a: Option<&[String]>, b: Option<&[String]>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

fn compare_present(a: &[String], b: &[String]) -> Ordering {
    if let ([x], [y]) = (a, b) {
        if let (Some(x), Some(y)) = (as_integer(x), as_integer(y)) {
            return compare_integers(x, y);
        }
    }
    for (x, y) in a.iter().zip(b) {
        match x.to_lowercase().cmp(&y.to_lowercase()) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Optional sign followed by ASCII digits only, split into
/// (negative, magnitude without leading zeros). Zero is never negative.
fn as_integer(s: &str) -> Option<(bool, &str)> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits.trim_start_matches('0');
    Some((negative && !magnitude.is_empty(), magnitude))
}

/// Numeric order of any length: sign, then digit count, then digits.
fn compare_integers((x_neg, x): (bool, &str), (y_neg, y): (bool, &str)) -> Ordering {
    let magnitude = x.len().cmp(&y.len()).then_with(|| x.cmp(y));
    match (x_neg, y_neg) {
        (false, false) => magnitude,
        (true, true) => magnitude.reverse(),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

/// Stable sort of `items` by the key `key` extracts.
pub fn sort_by_key_values<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> Option<&[String]>,
{
    merge_sort(items, &|a: &T, b: &T| compare_sort_keys(key(a), key(b)))
}

fn merge_sort<T, C>(mut items: Vec<T>, cmp: &C) -> Vec<T>
where
    C: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) != Ordering::Less,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}
