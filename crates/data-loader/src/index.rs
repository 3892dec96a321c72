//! Catalog loading and imputation.
//!
//! This module turns parsed CSV records into clean [`CatalogRow`]s:
//! - Trim every cell and treat empty / literal "nan" cells as missing
//! - Fill missing values of the nullable columns with the column mode
//! - Parse release years
//!
//! Rust concepts you'll learn:
//! - Using Rayon for parallel processing
//! - Iterator methods (map, filter, fold, etc.)
//! - Entry API for HashMap

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::stats;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

impl Catalog {
    /// Load the catalog CSV from disk.
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Parse the CSV into raw records
    /// 2. Compute the mode of every nullable column
    /// 3. Fill missing cells and build the final rows
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", path);

        let records = parser::parse_catalog(path)?;
        if records.is_empty() {
            return Err(DataLoadError::Empty(path.display().to_string()));
        }

        let mut catalog = Self::from_records(records)?;
        catalog.source = path.to_path_buf();

        info!("Loaded {} catalog rows", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog from already-parsed records, applying imputation.
    pub fn from_records(records: Vec<RawRecord>) -> Result<Self> {
        // Column modes are independent, so compute them in parallel
        let imputation: HashMap<NullableColumn, ImputationStats> = NullableColumn::ALL
            .par_iter()
            .map(|&column| (column, impute_column(&records, column)))
            .collect();

        for column in NullableColumn::ALL {
            let stats = &imputation[&column];
            if stats.filled > 0 {
                info!(
                    "Filled {} missing '{}' values with '{}'",
                    stats.filled,
                    column.name(),
                    stats.fill_value
                );
            }
        }

        let years = parse_years(&records)?;
        let fallback_year = mode_year(&years);

        let fill = |column: NullableColumn, record: &RawRecord| -> String {
            clean_cell(column.raw_value(record))
                .map(str::to_string)
                .unwrap_or_else(|| imputation[&column].fill_value.clone())
        };

        let rows = records
            .iter()
            .zip(years)
            .map(|(record, year)| CatalogRow {
                show_id: clean_cell(record.show_id.as_deref()).map(str::to_string),
                content_type: clean_cell(record.content_type.as_deref())
                    .unwrap_or_default()
                    .to_string(),
                title: clean_cell(record.title.as_deref())
                    .unwrap_or_default()
                    .to_string(),
                director: fill(NullableColumn::Director, record),
                cast: fill(NullableColumn::Cast, record),
                country: fill(NullableColumn::Country, record),
                release_year: year.unwrap_or(fallback_year),
                rating: fill(NullableColumn::Rating, record),
                duration: fill(NullableColumn::Duration, record),
                listed_in: fill(NullableColumn::ListedIn, record),
            })
            .collect();

        Ok(Self {
            rows,
            source: Default::default(),
            imputation,
        })
    }
}

/// Normalise a raw cell: trimmed, with empty and "nan" cells mapped to `None`
pub fn clean_cell(value: Option<&str>) -> Option<&str> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed == "nan" {
        None
    } else {
        Some(trimmed)
    }
}

/// Mode and missing count for one nullable column
fn impute_column(records: &[RawRecord], column: NullableColumn) -> ImputationStats {
    let present = records
        .iter()
        .filter_map(|record| clean_cell(column.raw_value(record)));

    let fill_value = stats::mode(present).unwrap_or_else(|| {
        warn!("Column '{}' has no values at all", column.name());
        String::new()
    });

    let filled = records
        .iter()
        .filter(|record| clean_cell(column.raw_value(record)).is_none())
        .count();

    ImputationStats { fill_value, filled }
}

/// Parse every release year, keeping `None` for missing cells
fn parse_years(records: &[RawRecord]) -> Result<Vec<Option<i32>>> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| match clean_cell(record.release_year.as_deref()) {
            Some(value) => parser::parse_release_year(value, idx + 1).map(Some),
            None => Ok(None),
        })
        .collect()
}

/// Most common release year (smallest year on ties), 0 if none are known
fn mode_year(years: &[Option<i32>]) -> i32 {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for year in years.iter().flatten() {
        *counts.entry(*year).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(year, _)| year)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(director: Option<&str>, country: Option<&str>, year: Option<&str>) -> RawRecord {
        RawRecord {
            content_type: Some("Movie".to_string()),
            title: Some("Title".to_string()),
            director: director.map(str::to_string),
            cast: Some("Someone".to_string()),
            country: country.map(str::to_string),
            release_year: year.map(str::to_string),
            rating: Some("PG".to_string()),
            duration: Some("90 min".to_string()),
            listed_in: Some("Dramas".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell(Some("  India ")), Some("India"));
        assert_eq!(clean_cell(Some("nan")), None);
        assert_eq!(clean_cell(Some("   ")), None);
        assert_eq!(clean_cell(None), None);
    }

    #[test]
    fn test_mode_imputation() {
        let records = vec![
            record(Some("A"), Some("India"), Some("2020")),
            record(Some("A"), None, Some("2019")),
            record(None, Some("India"), Some("2020")),
            record(Some("nan"), Some(" Japan "), None),
        ];

        let catalog = Catalog::from_records(records).unwrap();
        let rows = catalog.rows();

        assert_eq!(rows[1].country, "India");
        assert_eq!(rows[2].director, "A");
        assert_eq!(rows[3].director, "A");
        assert_eq!(rows[3].country, "Japan");
        assert_eq!(rows[3].release_year, 2020);

        let director_stats = catalog.imputation(NullableColumn::Director).unwrap();
        assert_eq!(director_stats.fill_value, "A");
        assert_eq!(director_stats.filled, 2);
    }

    #[test]
    fn test_invalid_year_is_error() {
        let records = vec![record(Some("A"), Some("India"), Some("next year"))];
        assert!(Catalog::from_records(records).is_err());
    }

    #[test]
    fn test_mode_year_ties() {
        assert_eq!(mode_year(&[Some(2001), Some(1999), None]), 1999);
        assert_eq!(mode_year(&[None]), 0);
    }
}
