//! Feature engineering for catalog rows.
//!
//! This module derives the model features for every catalog row:
//! primary director / cast / genre, integer duration, the composite
//! type+country key, director activity and the top-K reduced categories.

use crate::rating::RatingBucket;
use crate::reduce::TopKReducer;
use data_loader::{CatalogRow, stats};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Names of the nine model features, in design-matrix order.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "type",
    "country_reduced",
    "release_year",
    "duration_int",
    "cast_reduced",
    "director_activity",
    "type_country",
    "director_reduced",
    "listed_in_main",
];

/// Knobs for feature derivation and class balancing.
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// How many of the most frequent categories survive reduction
    pub top_k: usize,
    /// Seed used when downsampling each rating bucket
    pub balance_seed: u64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            balance_seed: 42,
        }
    }
}

/// A single feature cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Numeric(f64),
    Category(&'a str),
}

/// The nine model inputs for one row.
///
/// Training rows and request rows are both expressed as a `FeatureRecord`,
/// so they go through exactly the same encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub content_type: String,
    pub country_reduced: String,
    pub release_year: i32,
    pub duration: f64,
    pub cast_reduced: String,
    pub director_activity: f64,
    pub type_country: String,
    pub director_reduced: String,
    pub primary_genre: String,
}

impl FeatureRecord {
    /// Feature cells paired with their column names, in [`FEATURE_COLUMNS`] order
    pub fn values(&self) -> [(&'static str, FeatureValue<'_>); 9] {
        [
            (FEATURE_COLUMNS[0], FeatureValue::Category(&self.content_type)),
            (FEATURE_COLUMNS[1], FeatureValue::Category(&self.country_reduced)),
            (FEATURE_COLUMNS[2], FeatureValue::Numeric(self.release_year as f64)),
            (FEATURE_COLUMNS[3], FeatureValue::Numeric(self.duration)),
            (FEATURE_COLUMNS[4], FeatureValue::Category(&self.cast_reduced)),
            (FEATURE_COLUMNS[5], FeatureValue::Numeric(self.director_activity)),
            (FEATURE_COLUMNS[6], FeatureValue::Category(&self.type_country)),
            (FEATURE_COLUMNS[7], FeatureValue::Category(&self.director_reduced)),
            (FEATURE_COLUMNS[8], FeatureValue::Category(&self.primary_genre)),
        ]
    }
}

/// The reduced categorical fields a request cannot supply itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Country,
    Director,
    Cast,
}

impl CategoryField {
    pub const ALL: [CategoryField; 3] = [
        CategoryField::Country,
        CategoryField::Director,
        CategoryField::Cast,
    ];

    /// Catch-all value for categories outside the top K
    pub fn other_label(&self) -> &'static str {
        match self {
            CategoryField::Country => "Other_Country",
            CategoryField::Director => "Other_Director",
            CategoryField::Cast => "Other_Cast",
        }
    }

    /// Borrow this field's reduced value from a record
    pub fn value<'a>(&self, record: &'a FeatureRecord) -> &'a str {
        match self {
            CategoryField::Country => &record.country_reduced,
            CategoryField::Director => &record.director_reduced,
            CategoryField::Cast => &record.cast_reduced,
        }
    }
}

/// A catalog row with all derived columns attached.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    pub title: String,
    /// Full (unreduced) country
    pub country: String,
    pub primary_director: String,
    pub primary_cast: String,
    pub bucket: RatingBucket,
    pub features: FeatureRecord,
}

/// First comma-separated token, trimmed
pub fn primary_token(list: &str) -> &str {
    list.split(',').next().unwrap_or_default().trim()
}

/// Leading integer in a duration text ("90 min" -> 90, "2 Seasons" -> 2).
///
/// Returns 0 when the text contains no digits.
pub fn duration_minutes(text: &str) -> i64 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Derives feature rows from the catalog.
///
/// ## Performance Note
/// Frequencies are counted once up front; the per-row mapping then runs in
/// parallel with Rayon.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngineer {
    config: FeatureConfig,
}

impl FeatureEngineer {
    /// Create a new FeatureEngineer.
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Derive one [`DerivedRow`] per catalog row, in the same order.
    pub fn derive_rows(&self, rows: &[CatalogRow]) -> Vec<DerivedRow> {
        let directors: Vec<&str> = rows.iter().map(|r| primary_token(&r.director)).collect();
        let casts: Vec<&str> = rows.iter().map(|r| primary_token(&r.cast)).collect();

        // Director activity: how many titles share the primary director
        let director_activity: HashMap<String, usize> =
            stats::value_counts(directors.iter().copied()).into_iter().collect();

        let k = self.config.top_k;
        let countries = TopKReducer::fit(
            rows.iter().map(|r| r.country.as_str()),
            k,
            CategoryField::Country.other_label(),
        );
        let top_directors =
            TopKReducer::fit(directors.iter().copied(), k, CategoryField::Director.other_label());
        let top_casts = TopKReducer::fit(casts.iter().copied(), k, CategoryField::Cast.other_label());

        debug!(
            "Reducers fitted: {} countries, {} directors, {} cast members kept",
            countries.kept_len(),
            top_directors.kept_len(),
            top_casts.kept_len()
        );

        rows.par_iter()
            .zip(directors.par_iter())
            .zip(casts.par_iter())
            .map(|((row, &director), &cast)| DerivedRow {
                title: row.title.clone(),
                country: row.country.clone(),
                primary_director: director.to_string(),
                primary_cast: cast.to_string(),
                bucket: RatingBucket::from_rating(&row.rating),
                features: FeatureRecord {
                    content_type: row.content_type.clone(),
                    country_reduced: countries.reduce(&row.country).to_string(),
                    release_year: row.release_year,
                    duration: duration_minutes(&row.duration) as f64,
                    cast_reduced: top_casts.reduce(cast).to_string(),
                    director_activity: director_activity.get(director).copied().unwrap_or(0) as f64,
                    type_country: format!("{}_{}", row.content_type, row.country),
                    director_reduced: top_directors.reduce(director).to_string(),
                    primary_genre: primary_token(&row.listed_in).to_string(),
                },
            })
            .collect()
    }
}
