//! In-process classifiers for the rating predictor.
//!
//! This crate provides:
//! - The [`Classifier`] trait the prediction service depends on
//! - A CART [`DecisionTree`] with Gini impurity and sample weights
//! - A bagged [`RandomForest`] with class-balanced reweighting
//!
//! Models are fit once from a dense design matrix (`&[Vec<f64>]`) and
//! integer class targets, then queried one row at a time.
//!
//! ## Example Usage
//! ```ignore
//! use classifier::{Classifier, ForestParams, RandomForest};
//!
//! let forest = RandomForest::fit(&matrix, &targets, 3, &ForestParams::default())?;
//! let class = forest.predict(&row)?;
//! ```

pub mod error;
pub mod forest;
pub mod traits;
pub mod tree;

pub use error::{ClassifierError, Result};
pub use forest::{ClassWeight, ForestParams, MaxFeatures, RandomForest};
pub use traits::{Classifier, argmax};
pub use tree::{DecisionTree, TreeParams};
