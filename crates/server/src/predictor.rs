//! # Prediction Service
//!
//! Turns a request (genre text + duration) into a rating bucket:
//! 1. Validate the duration
//! 2. Title-case the genres and take the first as the primary genre
//! 3. Infer the content type from the duration
//! 4. Fill the fields a request cannot observe (country, director, cast)
//!    by sampling from the most common values of the training set
//! 5. One-hot encode the row on its own (drop-first) and project onto the
//!    training columns
//! 6. Ask the classifier, decode the label, apply the genre overrides
//!
//! ## Learning Goals
//! - Trait objects (`Arc<dyn Classifier>`) as the seam between the service
//!   and whatever model backs it
//! - Passing the RNG in (`&mut R`) so sampling is testable
//! - Converting between error types with `From` and `?`

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::{debug, info};

use crate::error::{ApiError, TrainingError};
use crate::overrides::apply_overrides;
use classifier::{Classifier, ForestParams, RandomForest, argmax};
use data_loader::Catalog;
use pipeline::{
    CategoryField, FeatureConfig, FeatureRecord, LabelEncoder, RatingBucket, TrainingColumns,
    TrainingSet,
};

/// Request-time constants
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorConfig {
    /// Durations above this are movies, the rest TV shows
    pub type_threshold: f64,
    /// Release year assumed for every request
    pub release_year: i32,
    /// How many of the most common values to sample unobserved fields from
    pub sample_pool: usize,
    /// Largest accepted duration
    pub max_duration: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            type_threshold: 20.0,
            release_year: 2020,
            sample_pool: 5,
            max_duration: 500.0,
        }
    }
}

/// Everything needed to train and serve
#[derive(Debug, Clone, Default)]
pub struct TrainingConfig {
    pub features: FeatureConfig,
    pub forest: ForestParams,
    pub predictor: PredictorConfig,
}

/// Body of `POST /predict`
///
/// The duration keeps its JSON form so `45` and `45.0` echo back as sent.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub genre: String,
    #[serde(default = "zero_duration")]
    pub duration: Number,
}

fn zero_duration() -> Number {
    Number::from(0)
}

impl PredictionRequest {
    pub fn new(genre: impl Into<String>, duration: Number) -> Self {
        Self {
            genre: genre.into(),
            duration,
        }
    }
}

/// Successful response of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: String,
    pub details: String,
}

/// Python-style title case: the first letter of every alphabetic run is
/// upper-cased, every other letter lower-cased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Comma-separated genre text -> trimmed, title-cased tokens
pub fn parse_genres(text: &str) -> Vec<String> {
    text.trim()
        .split(',')
        .map(|genre| title_case(genre.trim()))
        .collect()
}

/// Most common reduced values per unobserved field
#[derive(Debug, Clone, Default)]
struct SamplePools {
    country: Vec<String>,
    director: Vec<String>,
    cast: Vec<String>,
}

impl SamplePools {
    fn from_training(training: &TrainingSet, k: usize) -> Self {
        Self {
            country: training.top_values(CategoryField::Country, k),
            director: training.top_values(CategoryField::Director, k),
            cast: training.top_values(CategoryField::Cast, k),
        }
    }

    fn pool(&self, field: CategoryField) -> &[String] {
        match field {
            CategoryField::Country => &self.country,
            CategoryField::Director => &self.director,
            CategoryField::Cast => &self.cast,
        }
    }

    /// Uniform pick from the pool; the catch-all label when the pool is empty
    fn sample<R: Rng + ?Sized>(&self, field: CategoryField, rng: &mut R) -> String {
        self.pool(field)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| field.other_label().to_string())
    }
}

/// A trained model plus the frozen artifacts needed to query it.
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
    columns: TrainingColumns,
    label_encoder: LabelEncoder,
    pools: SamplePools,
    mean_director_activity: f64,
    config: PredictorConfig,
}

impl PredictionService {
    /// Wrap an already fitted classifier.
    pub fn new(
        training: &TrainingSet,
        classifier: Arc<dyn Classifier>,
        config: PredictorConfig,
    ) -> Self {
        Self {
            classifier,
            columns: training.columns().clone(),
            label_encoder: training.label_encoder().clone(),
            pools: SamplePools::from_training(training, config.sample_pool),
            mean_director_activity: training.mean_director_activity(),
            config,
        }
    }

    /// Build the training set and fit a random forest on it.
    pub fn train(catalog: &Catalog, config: &TrainingConfig) -> Result<Self, TrainingError> {
        let training = TrainingSet::build(catalog, &config.features)?;
        let forest = RandomForest::fit(
            training.matrix(),
            training.targets(),
            training.label_encoder().classes().len(),
            &config.forest,
        )?;
        info!("Model trained successfully");

        Ok(Self::new(&training, Arc::new(forest), config.predictor.clone()))
    }

    /// Load the catalog at `path`, then [`PredictionService::train`].
    pub fn from_csv(path: &Path, config: &TrainingConfig) -> Result<Self, TrainingError> {
        let catalog = Catalog::load_from_file(path)?;
        info!("Loaded {} titles from {}", catalog.len(), path.display());
        Self::train(&catalog, config)
    }

    pub fn columns(&self) -> &TrainingColumns {
        &self.columns
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Predict the rating bucket for one request.
    pub fn predict<R: Rng + ?Sized>(
        &self,
        request: &PredictionRequest,
        rng: &mut R,
    ) -> Result<Prediction, ApiError> {
        let max = self.config.max_duration;
        let duration = request
            .duration
            .as_f64()
            .filter(|&d| d > 0.0 && d <= max)
            .ok_or(ApiError::InvalidDuration { max })?;

        let genres = parse_genres(&request.genre);
        let primary_genre = genres.first().cloned().unwrap_or_default();
        let content_type = if duration > self.config.type_threshold {
            "Movie"
        } else {
            "TV Show"
        };

        let country = self.pools.sample(CategoryField::Country, rng);
        let record = FeatureRecord {
            content_type: content_type.to_string(),
            type_country: format!("{content_type}_{country}"),
            country_reduced: country,
            release_year: self.config.release_year,
            duration,
            cast_reduced: self.pools.sample(CategoryField::Cast, rng),
            director_activity: self.mean_director_activity,
            director_reduced: self.pools.sample(CategoryField::Director, rng),
            primary_genre: primary_genre.clone(),
        };

        let row = self
            .columns
            .encode_frame(std::slice::from_ref(&record))
            .pop()
            .unwrap_or_else(|| vec![0.0; self.columns.len()]);
        let proba = self.classifier.predict_proba(&row)?;
        let class = argmax(&proba);
        let label = self.label_encoder.inverse_transform(class)?;
        let predicted = RatingBucket::from_label(label)
            .ok_or_else(|| ApiError::Internal(format!("Unrecognised label {label}")))?;

        let bucket = apply_overrides(&primary_genre, predicted);
        debug!(
            "Model said {} (p={:.3}), returning {} for genre {:?}",
            predicted,
            proba.get(class).copied().unwrap_or_default(),
            bucket,
            primary_genre
        );

        Ok(Prediction {
            prediction: bucket.label().to_string(),
            details: format!(
                "Inferred Type: {content_type}, Duration: {}, Primary Genre: {primary_genre}.",
                request.duration
            ),
        })
    }
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("classifier", &self.classifier.name())
            .field("columns", &self.columns.len())
            .field("config", &self.config)
            .finish()
    }
}
