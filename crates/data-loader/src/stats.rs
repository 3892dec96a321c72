//! Frequency helpers shared by imputation and feature reduction.
//!
//! Both the mode fill on load and the top-K category reduction in the
//! pipeline need the same thing: count distinct values and order them by
//! frequency. Ties are broken by the value itself so the result never
//! depends on `HashMap` iteration order.

use std::collections::HashMap;

/// Count distinct values, most frequent first.
///
/// ## Ordering
/// - Higher count first
/// - Equal counts ordered by value (ascending)
pub fn value_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut ordered: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered
}

/// The most frequent value, or `None` for an empty input.
pub fn mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    value_counts(values).into_iter().next().map(|(value, _)| value)
}

/// The `k` most frequent values.
pub fn top_k<'a, I>(values: I, k: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    value_counts(values)
        .into_iter()
        .take(k)
        .map(|(value, _)| value)
        .collect()
}
