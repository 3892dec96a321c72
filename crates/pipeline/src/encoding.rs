//! One-hot encoding and schema projection.
//!
//! The design matrix is described by a frozen, ordered list of column
//! names ([`TrainingColumns`]):
//! - numeric features pass through under their own name and come first
//! - every categorical feature expands to `<feature>_<category>` indicator
//!   columns, with the first (sorted) category of each feature dropped
//!
//! Rows are expanded as a *frame*: the baseline category of each feature is
//! the first sorted category present in that frame, and it gets no
//! indicator. A frame of one row therefore keeps only its numeric features.
//! The sparse result is then *projected* onto the schema: columns the row
//! does not mention are 0, names the schema does not know are ignored.

use crate::features::{FEATURE_COLUMNS, FeatureRecord, FeatureValue};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// Name of the indicator column for `category` of `feature`
pub fn dummy_name(feature: &str, category: &str) -> String {
    format!("{feature}_{category}")
}

/// Sparse indicator form of a record: numeric features by name, and a 1.0
/// for the indicator column of each categorical value.
pub fn indicators(record: &FeatureRecord) -> HashMap<String, f64> {
    record
        .values()
        .into_iter()
        .map(|(name, value)| match value {
            FeatureValue::Numeric(v) => (name.to_string(), v),
            FeatureValue::Category(category) => (dummy_name(name, category), 1.0),
        })
        .collect()
}

/// Numeric feature names and the sorted categories seen per categorical
/// feature, both in feature order.
struct CategoryLevels<'a> {
    numeric: Vec<String>,
    categories: Vec<(&'static str, BTreeSet<&'a str>)>,
}

impl<'a> CategoryLevels<'a> {
    fn of(records: &'a [FeatureRecord]) -> Self {
        let mut numeric = Vec::new();
        let mut categories: Vec<(&'static str, BTreeSet<&'a str>)> = Vec::new();

        if let Some(first) = records.first() {
            for (name, value) in first.values() {
                match value {
                    FeatureValue::Numeric(_) => numeric.push(name.to_string()),
                    FeatureValue::Category(_) => categories.push((name, BTreeSet::new())),
                }
            }
        }

        for record in records {
            let mut slot = 0;
            for (_, value) in record.values() {
                if let FeatureValue::Category(category) = value {
                    categories[slot].1.insert(category);
                    slot += 1;
                }
            }
        }

        Self { numeric, categories }
    }

    /// Baseline (first sorted) category of the categorical feature at `slot`
    fn baseline(&self, slot: usize) -> Option<&'a str> {
        self.categories
            .get(slot)
            .and_then(|(_, seen)| seen.first().copied())
    }
}

/// Indicator form of a frame of records with the baseline category of each
/// feature dropped.
///
/// Baselines come from the frame itself, so in a one-row frame every
/// categorical value is a baseline and only numeric features remain.
pub fn drop_first_dummies(records: &[FeatureRecord]) -> Vec<HashMap<String, f64>> {
    let levels = CategoryLevels::of(records);
    records
        .iter()
        .map(|record| {
            let mut slot = 0;
            let mut features = HashMap::new();
            for (name, value) in record.values() {
                match value {
                    FeatureValue::Numeric(v) => {
                        features.insert(name.to_string(), v);
                    }
                    FeatureValue::Category(category) => {
                        if levels.baseline(slot) != Some(category) {
                            features.insert(dummy_name(name, category), 1.0);
                        }
                        slot += 1;
                    }
                }
            }
            features
        })
        .collect()
}

/// The frozen column layout of the design matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingColumns {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TrainingColumns {
    /// Build from an explicit ordered list of names.
    ///
    /// A repeated name keeps its first position.
    pub fn from_names(names: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        Self { names, positions }
    }

    /// Derive the schema from the training records (first category dropped).
    pub fn fit(records: &[FeatureRecord]) -> Self {
        let levels = CategoryLevels::of(records);
        let mut names = levels.numeric.clone();
        for (feature, seen) in &levels.categories {
            names.extend(seen.iter().skip(1).map(|category| dummy_name(feature, category)));
        }
        Self::from_names(names)
    }

    /// Column names, in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a column, if it is part of the schema
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Project a sparse name -> value map onto this schema.
    ///
    /// The result always has exactly `self.len()` entries in schema order;
    /// absent columns are 0 and unknown names are dropped.
    pub fn project(&self, features: &HashMap<String, f64>) -> Vec<f64> {
        let mut row = vec![0.0; self.names.len()];
        for (name, value) in features {
            if let Some(idx) = self.position(name) {
                row[idx] = *value;
            }
        }
        row
    }

    /// Encode one record against this schema
    pub fn encode(&self, record: &FeatureRecord) -> Vec<f64> {
        self.project(&indicators(record))
    }

    /// Encode many records in parallel, preserving order
    pub fn encode_all(&self, records: &[FeatureRecord]) -> Vec<Vec<f64>> {
        records.par_iter().map(|record| self.encode(record)).collect()
    }

    /// Expand `records` as one frame with [`drop_first_dummies`], then
    /// project every row onto this schema.
    pub fn encode_frame(&self, records: &[FeatureRecord]) -> Vec<Vec<f64>> {
        drop_first_dummies(records)
            .iter()
            .map(|features| self.project(features))
            .collect()
    }

    /// Names of the raw features that produced this schema
    pub fn feature_columns(&self) -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }
}
