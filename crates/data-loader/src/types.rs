//! Core domain types for the catalog dataset.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Structs with public fields
//! - Enums for fixed sets of values
//! - Derive macros for common traits

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// =============================================================================
// Raw Records
// =============================================================================

/// One CSV record exactly as it appears in the file.
///
/// Every field is optional: empty cells deserialize to `None` and are filled
/// in later by the imputation step in [`crate::index`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub show_id: Option<String>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub release_year: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub listed_in: Option<String>,
}

// =============================================================================
// Catalog Rows
// =============================================================================

/// A single title from the catalog after missing values have been filled.
///
/// Rust concepts:
/// - `#[derive(Debug, Clone)]` automatically implements these traits
/// - `pub` makes fields accessible outside this module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub show_id: Option<String>,
    /// "Movie" or "TV Show"
    pub content_type: String,
    pub title: String,
    /// Comma-separated list of directors
    pub director: String,
    /// Comma-separated list of cast members
    pub cast: String,
    pub country: String,
    pub release_year: i32,
    /// Raw rating code such as "TV-MA" or "PG-13"
    pub rating: String,
    /// Free text such as "90 min" or "2 Seasons"
    pub duration: String,
    /// Comma-separated genre listing
    pub listed_in: String,
}

/// The nullable columns that get mode-imputed on load.
///
/// Rust concept: Enums can represent a closed set of column names,
/// so a typo becomes a compile error instead of a silent lookup miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullableColumn {
    Director,
    Cast,
    Country,
    Rating,
    Duration,
    ListedIn,
}

impl NullableColumn {
    /// All imputed columns, in CSV order
    pub const ALL: [NullableColumn; 6] = [
        NullableColumn::Director,
        NullableColumn::Cast,
        NullableColumn::Country,
        NullableColumn::Rating,
        NullableColumn::Duration,
        NullableColumn::ListedIn,
    ];

    /// Column header as it appears in the CSV
    pub fn name(&self) -> &'static str {
        match self {
            NullableColumn::Director => "director",
            NullableColumn::Cast => "cast",
            NullableColumn::Country => "country",
            NullableColumn::Rating => "rating",
            NullableColumn::Duration => "duration",
            NullableColumn::ListedIn => "listed_in",
        }
    }

    /// Borrow this column's value out of a raw record
    pub fn raw_value<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        let value = match self {
            NullableColumn::Director => &record.director,
            NullableColumn::Cast => &record.cast,
            NullableColumn::Country => &record.country,
            NullableColumn::Rating => &record.rating,
            NullableColumn::Duration => &record.duration,
            NullableColumn::ListedIn => &record.listed_in,
        };
        value.as_deref()
    }
}

/// Summary of what imputation did to one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputationStats {
    /// The mode that replaced missing values
    pub fill_value: String,
    /// How many rows were missing
    pub filled: usize,
}

// =============================================================================
// Catalog - The Loaded Dataset
// =============================================================================

/// The whole dataset held in memory.
///
/// Loaded once at startup and never mutated afterwards; downstream crates
/// only ever borrow `&[CatalogRow]` from it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) rows: Vec<CatalogRow>,
    pub(crate) source: PathBuf,
    pub(crate) imputation: HashMap<NullableColumn, ImputationStats>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog directly from rows (used by tests and tools)
    pub fn from_rows(rows: Vec<CatalogRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// All rows, in file order
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the catalog has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Path the catalog was loaded from (empty for in-memory catalogs)
    pub fn source(&self) -> &std::path::Path {
        &self.source
    }

    /// Imputation summary for a column, if the catalog came from a file
    pub fn imputation(&self, column: NullableColumn) -> Option<&ImputationStats> {
        self.imputation.get(&column)
    }

    /// Append a row
    pub fn push(&mut self, row: CatalogRow) {
        self.rows.push(row);
    }
}
