//! # Data Loader Crate
//!
//! This crate handles loading the streaming catalog CSV (one row per title).
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RawRecord, CatalogRow, Catalog)
//! - **parser**: Parse the CSV into raw records
//! - **index**: Clean cells and mode-impute missing values
//! - **stats**: Frequency counting shared with the feature pipeline
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("netflix_titles.csv"))?;
//! println!("Loaded {} titles", catalog.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod stats;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{Catalog, CatalogRow, ImputationStats, NullableColumn, RawRecord};

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str) -> CatalogRow {
        CatalogRow {
            show_id: None,
            content_type: "Movie".to_string(),
            title: title.to_string(),
            director: "Director".to_string(),
            cast: "Actor".to_string(),
            country: "United States".to_string(),
            release_year: 2020,
            rating: "PG-13".to_string(),
            duration: "95 min".to_string(),
            listed_in: "Comedies".to_string(),
        }
    }

    #[test]
    fn test_catalog_creation() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_push_row() {
        let mut catalog = Catalog::new();
        catalog.push(row("First"));
        catalog.push(row("Second"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.rows()[1].title, "Second");
        assert!(catalog.imputation(NullableColumn::Country).is_none());
    }
}
