//! Class balancing by downsampling.
//!
//! ## Algorithm
//! 1. Group rows by rating bucket, groups ordered by first appearance
//! 2. Find the size of the smallest group
//! 3. Draw that many rows from every group without replacement, each
//!    group with its own RNG seeded from the same seed
//! 4. Concatenate the samples

use crate::features::DerivedRow;
use crate::rating::RatingBucket;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

/// Row count per bucket, in first-appearance order
pub fn bucket_counts(rows: &[DerivedRow]) -> Vec<(RatingBucket, usize)> {
    let mut counts: Vec<(RatingBucket, usize)> = Vec::new();
    for row in rows {
        match counts.iter_mut().find(|(bucket, _)| *bucket == row.bucket) {
            Some((_, count)) => *count += 1,
            None => counts.push((row.bucket, 1)),
        }
    }
    counts
}

/// Downsample every bucket to the size of the smallest one.
///
/// The result is deterministic for a given `seed` and input order.
pub fn balance_by_bucket(rows: &[DerivedRow], seed: u64) -> Vec<DerivedRow> {
    let counts = bucket_counts(rows);
    let Some(min_count) = counts.iter().map(|(_, count)| *count).min() else {
        return Vec::new();
    };

    let mut balanced = Vec::with_capacity(min_count * counts.len());
    for (bucket, count) in &counts {
        let group: Vec<&DerivedRow> = rows.iter().filter(|row| row.bucket == *bucket).collect();

        let mut rng = StdRng::seed_from_u64(seed);
        let picked = rand::seq::index::sample(&mut rng, group.len(), min_count);
        balanced.extend(picked.iter().map(|idx| group[idx].clone()));

        debug!("Bucket {}: kept {} of {}", bucket, min_count, count);
    }

    balanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureRecord;

    fn row(title: &str, bucket: RatingBucket) -> DerivedRow {
        DerivedRow {
            title: title.to_string(),
            country: "India".to_string(),
            primary_director: "D".to_string(),
            primary_cast: "C".to_string(),
            bucket,
            features: FeatureRecord {
                content_type: "Movie".to_string(),
                country_reduced: "India".to_string(),
                release_year: 2020,
                duration: 90.0,
                cast_reduced: "C".to_string(),
                director_activity: 1.0,
                type_country: "Movie_India".to_string(),
                director_reduced: "D".to_string(),
                primary_genre: "Dramas".to_string(),
            },
        }
    }

    fn sample_rows() -> Vec<DerivedRow> {
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(row(&format!("adult-{i}"), RatingBucket::AdultMature));
        }
        for i in 0..3 {
            rows.push(row(&format!("kids-{i}"), RatingBucket::KidsYoung));
        }
        for i in 0..6 {
            rows.push(row(&format!("teen-{i}"), RatingBucket::TeenFamily));
        }
        rows
    }

    #[test]
    fn test_bucket_counts_first_appearance_order() {
        let counts = bucket_counts(&sample_rows());
        assert_eq!(
            counts,
            vec![
                (RatingBucket::AdultMature, 10),
                (RatingBucket::KidsYoung, 3),
                (RatingBucket::TeenFamily, 6),
            ]
        );
    }

    #[test]
    fn test_balanced_groups_have_equal_size() {
        let balanced = balance_by_bucket(&sample_rows(), 42);
        assert_eq!(balanced.len(), 9);
        for (_, count) in bucket_counts(&balanced) {
            assert_eq!(count, 3);
        }
    }

    #[test]
    fn test_sampling_without_replacement() {
        let balanced = balance_by_bucket(&sample_rows(), 42);
        let mut titles: Vec<&str> = balanced.iter().map(|r| r.title.as_str()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), 9);
    }

    #[test]
    fn test_balancing_is_deterministic() {
        let a = balance_by_bucket(&sample_rows(), 42);
        let b = balance_by_bucket(&sample_rows(), 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input() {
        assert!(balance_by_bucket(&[], 42).is_empty());
    }
}
