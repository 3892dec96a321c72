//! Training-set assembly.
//!
//! Ties the pipeline stages together: derive features, balance the rating
//! buckets, fit the label encoder and the column schema, then encode the
//! design matrix.

use crate::balance::{balance_by_bucket, bucket_counts};
use crate::encoding::TrainingColumns;
use crate::error::{PipelineError, Result};
use crate::features::{CategoryField, DerivedRow, FeatureConfig, FeatureEngineer, FeatureRecord};
use crate::label::LabelEncoder;
use crate::rating::RatingBucket;
use data_loader::{Catalog, stats};
use tracing::{info, instrument};

/// Everything the model is fitted on, plus what a request needs to fill in
/// the fields it cannot observe.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    rows: Vec<DerivedRow>,
    columns: TrainingColumns,
    label_encoder: LabelEncoder,
    matrix: Vec<Vec<f64>>,
    targets: Vec<usize>,
    source_counts: Vec<(RatingBucket, usize)>,
    source_rows: usize,
}

impl TrainingSet {
    /// Build the balanced, encoded training set from a loaded catalog.
    ///
    /// ## Algorithm
    /// 1. Derive the feature columns for every row
    /// 2. Downsample each rating bucket to the smallest bucket size
    /// 3. Fit the label encoder on the balanced labels
    /// 4. Fit the one-hot schema and encode the matrix
    #[instrument(skip_all, fields(rows = catalog.len()))]
    pub fn build(catalog: &Catalog, config: &FeatureConfig) -> Result<Self> {
        if catalog.is_empty() {
            return Err(PipelineError::EmptyCatalog);
        }

        let derived = FeatureEngineer::new(config.clone()).derive_rows(catalog.rows());
        let source_counts = bucket_counts(&derived);
        info!("Rating buckets before balancing: {:?}", source_counts);

        let rows = balance_by_bucket(&derived, config.balance_seed);
        info!("Balanced training set: {} rows", rows.len());

        let label_encoder = LabelEncoder::fit(rows.iter().map(|row| row.bucket.label()));
        let targets = rows
            .iter()
            .map(|row| label_encoder.transform(row.bucket.label()))
            .collect::<Result<Vec<_>>>()?;

        let records: Vec<FeatureRecord> = rows.iter().map(|row| row.features.clone()).collect();
        let columns = TrainingColumns::fit(&records);
        let matrix = columns.encode_all(&records);
        info!("Encoded design matrix: {} x {}", matrix.len(), columns.len());

        Ok(Self {
            rows,
            columns,
            label_encoder,
            matrix,
            targets,
            source_counts,
            source_rows: catalog.len(),
        })
    }

    /// Balanced rows
    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn columns(&self) -> &TrainingColumns {
        &self.columns
    }

    pub fn label_encoder(&self) -> &LabelEncoder {
        &self.label_encoder
    }

    /// Encoded rows, one per balanced row, each `columns().len()` wide
    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    /// Encoded targets aligned with `matrix()`
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Bucket sizes before balancing, first-appearance order
    pub fn source_counts(&self) -> &[(RatingBucket, usize)] {
        &self.source_counts
    }

    /// Number of catalog rows the set was built from
    pub fn source_rows(&self) -> usize {
        self.source_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `k` most frequent reduced values of a field in the balanced set
    pub fn top_values(&self, field: CategoryField, k: usize) -> Vec<String> {
        stats::top_k(self.rows.iter().map(|row| field.value(&row.features)), k)
    }

    /// Mean director activity over the balanced set (0 when empty)
    pub fn mean_director_activity(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let total: f64 = self.rows.iter().map(|row| row.features.director_activity).sum();
        total / self.rows.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::CatalogRow;

    fn row(title: &str, country: &str, rating: &str, director: &str) -> CatalogRow {
        CatalogRow {
            show_id: None,
            content_type: "Movie".to_string(),
            title: title.to_string(),
            director: director.to_string(),
            cast: "Lead".to_string(),
            country: country.to_string(),
            release_year: 2018,
            rating: rating.to_string(),
            duration: "90 min".to_string(),
            listed_in: "Dramas".to_string(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_rows(vec![
            row("a", "India", "TV-MA", "X"),
            row("b", "India", "R", "X"),
            row("c", "Japan", "TV-MA", "Y"),
            row("d", "Japan", "PG-13", "Y"),
            row("e", "India", "TV-Y", "X"),
            row("f", "India", "TV-14", "Z"),
            row("g", "Japan", "TV-Y", "X"),
        ])
    }

    #[test]
    fn test_build_balances_and_aligns() {
        let set = TrainingSet::build(&catalog(), &FeatureConfig::default()).unwrap();

        assert_eq!(set.source_rows(), 7);
        assert_eq!(set.len(), 6);
        assert_eq!(set.matrix().len(), set.targets().len());
        assert!(set.matrix().iter().all(|r| r.len() == set.columns().len()));
        assert_eq!(set.label_encoder().classes().len(), 3);
    }

    #[test]
    fn test_top_values_and_mean_activity() {
        let set = TrainingSet::build(&catalog(), &FeatureConfig::default()).unwrap();

        let countries = set.top_values(CategoryField::Country, 5);
        assert!(!countries.is_empty());
        assert!(countries.len() <= 2);
        assert!(set.mean_director_activity() >= 1.0);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = TrainingSet::build(&Catalog::new(), &FeatureConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyCatalog));
    }
}
