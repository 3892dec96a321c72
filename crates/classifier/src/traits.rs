//! The classifier seam used by the prediction service.

use crate::error::{ClassifierError, Result};

/// A fitted model mapping an aligned feature vector to a class index.
///
/// ## Design Note
/// - `Send + Sync` so one fitted model can sit behind an `Arc` and serve
///   concurrent requests
/// - Only `predict_proba` is required; `predict` takes its argmax
pub trait Classifier: Send + Sync {
    /// Returns the name of this model (for logging/debugging)
    fn name(&self) -> &str;

    /// Width of the feature vectors this model accepts
    fn n_features(&self) -> usize;

    /// Number of classes this model can return
    fn n_classes(&self) -> usize;

    /// Class probabilities for one row, indexed by class.
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>>;

    /// Most probable class for one row.
    ///
    /// Ties go to the lowest class index.
    fn predict(&self, row: &[f64]) -> Result<usize> {
        Ok(argmax(&self.predict_proba(row)?))
    }
}

/// Index of the largest value, first one on ties (0 for an empty slice)
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = idx;
        }
    }
    best
}

/// Reject rows whose width differs from what the model was fitted on
pub(crate) fn check_width(expected: usize, row: &[f64]) -> Result<()> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(ClassifierError::FeatureMismatch {
            expected,
            got: row.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f64>);

    impl Classifier for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn n_features(&self) -> usize {
            1
        }

        fn n_classes(&self) -> usize {
            self.0.len()
        }

        fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
            check_width(1, row)?;
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_default_predict_uses_proba() {
        let model = Fixed(vec![0.1, 0.3, 0.6]);
        assert_eq!(model.predict(&[1.0]).unwrap(), 2);
        assert_eq!(
            model.predict(&[1.0, 2.0]),
            Err(ClassifierError::FeatureMismatch {
                expected: 1,
                got: 2
            })
        );
    }
}
