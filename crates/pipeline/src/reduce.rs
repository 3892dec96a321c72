//! Top-K category reduction.
//!
//! High-cardinality columns (country, director, cast) are collapsed to
//! their K most frequent values plus one catch-all label, so the one-hot
//! expansion stays small.

use data_loader::stats;
use std::collections::HashSet;

/// Keeps the K most frequent values of a column and maps everything else
/// to a fixed "other" label.
#[derive(Debug, Clone)]
pub struct TopKReducer {
    kept: HashSet<String>,
    other: String,
}

impl TopKReducer {
    /// Fit the reducer on every value of the column.
    pub fn fit<'a, I>(values: I, k: usize, other: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            kept: stats::top_k(values, k).into_iter().collect(),
            other: other.into(),
        }
    }

    /// The value itself if it is in the top K, the catch-all label otherwise
    pub fn reduce<'a>(&'a self, value: &'a str) -> &'a str {
        if self.kept.contains(value) {
            value
        } else {
            &self.other
        }
    }

    /// Number of values kept verbatim
    pub fn kept_len(&self) -> usize {
        self.kept.len()
    }

    /// The catch-all label
    pub fn other(&self) -> &str {
        &self.other
    }
}
