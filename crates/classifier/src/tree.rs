//! CART decision tree for classification.
//!
//! Nodes live in a flat arena; node 0 is the root.
//!
//! # Growing
//!
//! - A node becomes a leaf when it is pure, has reached `max_depth`, has
//!   fewer than `min_samples_split` samples, or no feature admits a split
//! - Otherwise features are visited in random order; constant features are
//!   skipped and do not count toward `max_features`
//! - For each visited feature the samples are sorted by value and every
//!   boundary between distinct values is scored by weighted Gini impurity
//! - The threshold is the midpoint between the two neighbouring values
//!
//! # Traversal
//!
//! - At a split, go left when `row[feature] <= threshold`, right otherwise
//! - A leaf returns its weighted class distribution, normalised to sum to 1

use crate::error::{ClassifierError, Result};
use crate::traits::{Classifier, check_width};
use rand::Rng;
use rand::seq::SliceRandom;

/// Values closer than this are treated as equal when looking for splits
const FEATURE_THRESHOLD: f64 = 1e-7;

/// Growth limits for a single tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeParams {
    /// Maximum depth (root is depth 0); `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Non-constant features evaluated per split
    pub max_features: usize,
    /// Nodes with fewer samples are not split
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_features: usize::MAX,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

/// A fitted classification tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    n_classes: usize,
    depth: usize,
}

/// Check shapes shared by every fit entry point, returning the row width.
pub(crate) fn validate_training(x: &[Vec<f64>], y: &[usize], n_classes: usize) -> Result<usize> {
    let Some(first) = x.first() else {
        return Err(ClassifierError::EmptyTrainingSet);
    };
    if x.len() != y.len() {
        return Err(ClassifierError::LengthMismatch {
            rows: x.len(),
            targets: y.len(),
        });
    }
    let n_features = first.len();
    if let Some(row) = x.iter().find(|row| row.len() != n_features) {
        return Err(ClassifierError::FeatureMismatch {
            expected: n_features,
            got: row.len(),
        });
    }
    if let Some(&label) = y.iter().find(|&&label| label >= n_classes) {
        return Err(ClassifierError::InvalidLabel { label, n_classes });
    }
    Ok(n_features)
}

impl DecisionTree {
    /// Fit a tree on weighted samples.
    ///
    /// Samples with zero weight are ignored entirely. `rng` drives the
    /// feature order at every split.
    pub fn fit<R: Rng + ?Sized>(
        x: &[Vec<f64>],
        y: &[usize],
        weights: &[f64],
        n_classes: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self> {
        let n_features = validate_training(x, y, n_classes)?;
        if weights.len() != x.len() {
            return Err(ClassifierError::LengthMismatch {
                rows: x.len(),
                targets: weights.len(),
            });
        }
        if params.max_features == 0 {
            return Err(ClassifierError::InvalidParams(
                "max_features must be at least 1".to_string(),
            ));
        }

        let samples: Vec<usize> = (0..x.len()).filter(|&i| weights[i] > 0.0).collect();
        if samples.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let mut grower = Grower {
            x,
            y,
            weights,
            n_classes,
            n_features,
            params,
            rng,
            nodes: Vec::new(),
            depth: 0,
        };
        grower.grow(samples, 0);

        Ok(Self {
            nodes: grower.nodes,
            n_features,
            n_classes,
            depth: grower.depth,
        })
    }

    /// Fit with unit weights
    pub fn fit_unweighted<R: Rng + ?Sized>(
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self> {
        Self::fit(x, y, &vec![1.0; x.len()], n_classes, params, rng)
    }

    /// Depth of the deepest leaf
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Leaf distribution for a row whose width has already been checked
    pub(crate) fn leaf_distribution(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &str {
        "DecisionTree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features, row)?;
        Ok(self.leaf_distribution(row).to_vec())
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    /// Weighted child impurity; lower is better
    score: f64,
}

struct Grower<'a, R: ?Sized> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    weights: &'a [f64],
    n_classes: usize,
    n_features: usize,
    params: &'a TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
    depth: usize,
}

impl<R: Rng + ?Sized> Grower<'_, R> {
    /// Grow the subtree for `samples`, returning its node index
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let totals = self.class_totals(&samples);
        let total_weight: f64 = totals.iter().sum();

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: totals.iter().map(|w| w / total_weight).collect(),
        });
        self.depth = self.depth.max(depth);

        let at_depth_limit = self.params.max_depth.is_some_and(|max| depth >= max);
        let pure = totals.iter().filter(|&&w| w > 0.0).count() <= 1;
        if at_depth_limit || pure || samples.len() < self.params.min_samples_split {
            return idx;
        }

        let Some(split) = self.best_split(&samples, &totals, total_weight) else {
            return idx;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.x[i][split.feature] <= split.threshold);

        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    fn class_totals(&self, samples: &[usize]) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_classes];
        for &i in samples {
            totals[self.y[i]] += self.weights[i];
        }
        totals
    }

    fn best_split(&mut self, samples: &[usize], totals: &[f64], total_weight: f64) -> Option<Split> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<Split> = None;
        let mut visited = 0;
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(samples.len());
        let mut left = vec![0.0; self.n_classes];

        for feature in features {
            if visited >= self.params.max_features {
                break;
            }

            sorted.clear();
            sorted.extend(samples.iter().map(|&i| (self.x[i][feature], i)));
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (lowest, highest) = (sorted[0].0, sorted[sorted.len() - 1].0);
            if highest <= lowest + FEATURE_THRESHOLD {
                continue;
            }
            visited += 1;

            left.iter_mut().for_each(|w| *w = 0.0);
            let mut left_weight = 0.0;

            for pos in 0..sorted.len() - 1 {
                let (value, i) = sorted[pos];
                left[self.y[i]] += self.weights[i];
                left_weight += self.weights[i];

                let next = sorted[pos + 1].0;
                if next <= value + FEATURE_THRESHOLD {
                    continue;
                }

                let right_weight = total_weight - left_weight;
                let score = left_weight * gini(left.iter().copied(), left_weight)
                    + right_weight
                        * gini(
                            totals.iter().zip(&left).map(|(t, l)| t - l),
                            right_weight,
                        );

                if best.as_ref().is_none_or(|b| score < b.score) {
                    let mut threshold = value / 2.0 + next / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(Split {
                        feature,
                        threshold,
                        score,
                    });
                }
            }
        }

        best
    }
}

/// Gini impurity of a weighted class histogram
fn gini(counts: impl Iterator<Item = f64>, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.map(|c| (c / total).powi(2)).sum::<f64>()
}
