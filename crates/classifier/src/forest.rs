//! Bagged random forest.
//!
//! ## Algorithm
//! 1. Compute one weight per class (`n_samples / (n_classes * count)` when
//!    balanced)
//! 2. Draw one seed per tree from a master RNG seeded with `seed`
//! 3. For every tree, in parallel: draw a bootstrap sample (counts per row),
//!    multiply the counts by the class weights and grow a CART tree that
//!    evaluates `max_features` features per split
//! 4. Predict by averaging the trees' leaf distributions
//!
//! ## Rust concepts you'll learn
//! - Deterministic parallelism: all randomness is drawn up front or from a
//!   per-tree RNG, so Rayon's scheduling never changes the result
//! - `collect::<Result<Vec<_>>>()` to stop at the first failing tree

use crate::error::{ClassifierError, Result};
use crate::traits::{Classifier, check_width};
use crate::tree::{DecisionTree, TreeParams, validate_training};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

/// How many features each split looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`, at least 1
    Sqrt,
    /// Every feature
    All,
    /// A fixed count, clamped to `1..=n_features`
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let count = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(count) => *count,
        };
        count.clamp(1, n_features.max(1))
    }
}

/// Per-class reweighting applied on top of the bootstrap counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassWeight {
    Uniform,
    /// Inverse class frequency over the full training targets
    Balanced,
}

/// Forest hyper-parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub max_features: MaxFeatures,
    pub min_samples_split: usize,
    pub bootstrap: bool,
    pub class_weight: ClassWeight,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_depth: Some(30),
            max_features: MaxFeatures::Sqrt,
            min_samples_split: 2,
            bootstrap: true,
            class_weight: ClassWeight::Balanced,
            seed: 42,
        }
    }
}

/// Weight per class index.
///
/// Balanced weights use the number of classes actually present in `y`;
/// classes with no samples get weight 1.
pub fn class_weights(y: &[usize], n_classes: usize, mode: ClassWeight) -> Vec<f64> {
    let mut counts = vec![0usize; n_classes];
    for &label in y {
        counts[label] += 1;
    }

    match mode {
        ClassWeight::Uniform => vec![1.0; n_classes],
        ClassWeight::Balanced => {
            let present = counts.iter().filter(|&&c| c > 0).count().max(1);
            counts
                .iter()
                .map(|&count| {
                    if count == 0 {
                        1.0
                    } else {
                        y.len() as f64 / (present * count) as f64
                    }
                })
                .collect()
        }
    }
}

/// An ensemble of decision trees fit on bootstrap samples.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    /// Fit the forest.
    ///
    /// The result depends only on the inputs and `params`, not on the
    /// number of threads.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self> {
        let n_features = validate_training(x, y, n_classes)?;
        if params.n_estimators == 0 {
            return Err(ClassifierError::InvalidParams(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        let weights = class_weights(y, n_classes, params.class_weight);
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            max_features: params.max_features.resolve(n_features),
            min_samples_split: params.min_samples_split,
        };
        debug!("Class weights: {:?}, tree params: {:?}", weights, tree_params);

        let mut master = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.random()).collect();

        info!(
            "Fitting {} trees on {} rows x {} features",
            params.n_estimators,
            x.len(),
            n_features
        );

        let trees = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let counts = if params.bootstrap {
                    bootstrap_counts(x.len(), &mut rng)
                } else {
                    vec![1.0; x.len()]
                };
                let sample_weights: Vec<f64> = counts
                    .iter()
                    .zip(y)
                    .map(|(count, &label)| count * weights[label])
                    .collect();
                DecisionTree::fit(x, y, &sample_weights, n_classes, &tree_params, &mut rng)
            })
            .collect::<Result<Vec<_>>>()?;

        let deepest = trees.iter().map(DecisionTree::depth).max().unwrap_or(0);
        info!("Forest fitted: {} trees, deepest {}", trees.len(), deepest);

        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

/// How many times each of `n` rows is drawn in a bootstrap sample of size `n`
fn bootstrap_counts<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    let mut counts = vec![0.0; n];
    for _ in 0..n {
        counts[rng.random_range(0..n)] += 1.0;
    }
    counts
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "RandomForest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features, row)?;

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (total, p) in proba.iter_mut().zip(tree.leaf_distribution(row)) {
                *total += p;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two well separated clusters plus a noise column
    fn clusters() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..30 {
            let noise = (i % 5) as f64;
            x.push(vec![i as f64 * 0.1, noise, 1.0]);
            y.push(0);
            x.push(vec![10.0 + i as f64 * 0.1, noise, 1.0]);
            y.push(1);
            x.push(vec![20.0 + i as f64 * 0.1, noise, 1.0]);
            y.push(2);
        }
        (x, y)
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_estimators: 25,
            ..ForestParams::default()
        }
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Sqrt.resolve(100), 10);
        assert_eq!(MaxFeatures::Sqrt.resolve(3), 1);
        assert_eq!(MaxFeatures::All.resolve(7), 7);
        assert_eq!(MaxFeatures::Count(50).resolve(7), 7);
        assert_eq!(MaxFeatures::Count(0).resolve(7), 1);
    }

    #[test]
    fn test_balanced_class_weights() {
        let y = [0, 0, 0, 1];
        let weights = class_weights(&y, 3, ClassWeight::Balanced);
        assert!((weights[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((weights[1] - 2.0).abs() < 1e-12);
        assert_eq!(weights[2], 1.0);

        assert_eq!(class_weights(&y, 2, ClassWeight::Uniform), vec![1.0, 1.0]);
    }

    #[test]
    fn test_bootstrap_counts_sum_to_n() {
        let mut rng = StdRng::seed_from_u64(3);
        let counts = bootstrap_counts(50, &mut rng);
        assert_eq!(counts.iter().sum::<f64>(), 50.0);
    }

    #[test]
    fn test_forest_separates_clusters() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();

        assert_eq!(forest.n_estimators(), 25);
        assert_eq!(forest.predict(&[1.0, 2.0, 1.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[11.5, 0.0, 1.0]).unwrap(), 1);
        assert_eq!(forest.predict(&[22.0, 4.0, 1.0]).unwrap(), 2);
    }

    #[test]
    fn test_proba_is_a_distribution() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();

        let proba = forest.predict_proba(&[10.5, 1.0, 1.0]).unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = clusters();
        let a = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();
        let b = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();

        for row in &x {
            assert_eq!(a.predict_proba(row).unwrap(), b.predict_proba(row).unwrap());
        }
    }

    #[test]
    fn test_invalid_params() {
        let (x, y) = clusters();
        let params = ForestParams {
            n_estimators: 0,
            ..ForestParams::default()
        };
        assert!(matches!(
            RandomForest::fit(&x, &y, 3, &params),
            Err(ClassifierError::InvalidParams(_))
        ));

        let forest = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();
        assert_eq!(
            forest.predict(&[1.0]),
            Err(ClassifierError::FeatureMismatch {
                expected: 3,
                got: 1
            })
        );
    }
}
