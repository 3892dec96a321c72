//! Feature pipeline for catalog rating prediction.
//!
//! This crate turns a loaded catalog into a model-ready training set:
//! - `features`: derived columns (primary tokens, durations, activity)
//! - `reduce`: top-K category reduction
//! - `rating`: the three-way audience rating bucket
//! - `balance`: downsampling every bucket to the same size
//! - `label`: label encoder for the target
//! - `encoding`: one-hot schema and projection of arbitrary rows onto it
//! - `training`: assembles all of the above
//!
//! ## Architecture
//! ```text
//! Catalog -> FeatureEngineer -> balance_by_bucket -> LabelEncoder
//!                                                 -> TrainingColumns -> matrix
//! ```
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FeatureConfig, TrainingSet};
//!
//! let set = TrainingSet::build(&catalog, &FeatureConfig::default())?;
//! println!("{} rows x {} columns", set.len(), set.columns().len());
//! ```

pub mod balance;
pub mod encoding;
pub mod error;
pub mod features;
pub mod label;
pub mod rating;
pub mod reduce;
pub mod training;

// Re-export main types
pub use encoding::{TrainingColumns, drop_first_dummies, indicators};
pub use error::{PipelineError, Result};
pub use features::{
    CategoryField, DerivedRow, FEATURE_COLUMNS, FeatureConfig, FeatureEngineer, FeatureRecord,
};
pub use label::LabelEncoder;
pub use rating::RatingBucket;
pub use training::TrainingSet;
