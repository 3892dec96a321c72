//! Label encoding for the rating bucket target.

use crate::error::{PipelineError, Result};

/// Bijection between string labels and class indices.
///
/// Classes are the distinct labels seen at fit time, sorted, so the
/// mapping never depends on input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit the encoder on every label of the training set
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Known classes, index order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Label -> class index
    pub fn transform(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .map_err(|_| PipelineError::UnknownLabel(label.to_string()))
    }

    /// Class index -> label
    pub fn inverse_transform(&self, index: usize) -> Result<&str> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(PipelineError::UnknownClass {
                index,
                classes: self.classes.len(),
            })
    }
}
