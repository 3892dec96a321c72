//! Integration tests for the pipeline.
//!
//! These tests build a training set from a synthetic catalog and check the
//! invariants the server relies on.

use data_loader::{Catalog, CatalogRow};
use pipeline::{
    CategoryField, FeatureConfig, FeatureRecord, RatingBucket, TrainingSet, indicators,
};
use std::collections::HashSet;

fn title(i: usize, rating: &str, country: &str, genre: &str, duration: &str) -> CatalogRow {
    CatalogRow {
        show_id: Some(format!("s{i}")),
        content_type: if duration.contains("Season") { "TV Show" } else { "Movie" }.to_string(),
        title: format!("Title {i}"),
        director: format!("Director {}", i % 7),
        cast: format!("Actor {}, Extra {}", i % 11, i),
        country: country.to_string(),
        release_year: 2000 + (i % 20) as i32,
        rating: rating.to_string(),
        duration: duration.to_string(),
        listed_in: format!("{genre}, International Movies"),
    }
}

fn synthetic_catalog() -> Catalog {
    let countries = ["United States", "India", "Japan", "France", "Spain"];
    let mut rows = Vec::new();
    for i in 0..60 {
        let country = countries[i % countries.len()];
        rows.push(title(i, "TV-MA", country, "Horror Movies", "95 min"));
    }
    for i in 60..100 {
        let country = countries[i % countries.len()];
        rows.push(title(i, "PG-13", country, "Comedies", "2 Seasons"));
    }
    for i in 100..125 {
        let country = countries[i % countries.len()];
        rows.push(title(i, "TV-Y", country, "Kids' TV", "1 Season"));
    }
    Catalog::from_rows(rows)
}

#[test]
fn test_training_set_is_balanced() {
    let set = TrainingSet::build(&synthetic_catalog(), &FeatureConfig::default()).unwrap();

    assert_eq!(set.source_rows(), 125);
    assert_eq!(
        set.source_counts(),
        &[
            (RatingBucket::AdultMature, 60),
            (RatingBucket::TeenFamily, 40),
            (RatingBucket::KidsYoung, 25),
        ]
    );
    assert_eq!(set.len(), 75);

    for bucket in RatingBucket::ALL {
        let count = set.rows().iter().filter(|row| row.bucket == bucket).count();
        assert_eq!(count, 25, "bucket {bucket} not balanced");
    }
}

#[test]
fn test_targets_match_labels() {
    let set = TrainingSet::build(&synthetic_catalog(), &FeatureConfig::default()).unwrap();
    let encoder = set.label_encoder();

    for (row, target) in set.rows().iter().zip(set.targets()) {
        assert_eq!(encoder.inverse_transform(*target).unwrap(), row.bucket.label());
    }
}

#[test]
fn test_reduced_categories_are_bounded() {
    let config = FeatureConfig {
        top_k: 3,
        balance_seed: 42,
    };
    let set = TrainingSet::build(&synthetic_catalog(), &config).unwrap();

    for field in CategoryField::ALL {
        let distinct: HashSet<&str> = set.rows().iter().map(|r| field.value(&r.features)).collect();
        assert!(distinct.len() <= 4, "{field:?} has {} values", distinct.len());
    }
}

#[test]
fn test_request_row_projects_onto_schema() {
    let set = TrainingSet::build(&synthetic_catalog(), &FeatureConfig::default()).unwrap();
    let columns = set.columns();

    let request = FeatureRecord {
        content_type: "Movie".to_string(),
        country_reduced: "Atlantis".to_string(),
        release_year: 2020,
        duration: 45.0,
        cast_reduced: "Other_Cast".to_string(),
        director_activity: set.mean_director_activity(),
        type_country: "Movie_Atlantis".to_string(),
        director_reduced: "Other_Director".to_string(),
        primary_genre: "Comedies".to_string(),
    };

    let vector = columns.project(&indicators(&request));
    assert_eq!(vector.len(), columns.len());
    assert_eq!(vector[columns.position("release_year").unwrap()], 2020.0);
    assert_eq!(vector[columns.position("duration_int").unwrap()], 45.0);
    // The sorted-first genre is the dropped baseline, so its name is not a column
    assert!(columns.position("listed_in_main_Comedies").is_none());
    assert_eq!(vector[columns.position("listed_in_main_Kids' TV").unwrap()], 0.0);

    // Encoded on its own, the request keeps only its numeric features
    let frame = columns.encode_frame(std::slice::from_ref(&request));
    assert_eq!(frame.len(), 1);
    assert_eq!(&frame[0][..3], [2020.0, 45.0, set.mean_director_activity()]);
    assert!(frame[0][3..].iter().all(|&v| v == 0.0));
}

#[test]
fn test_build_is_deterministic() {
    let a = TrainingSet::build(&synthetic_catalog(), &FeatureConfig::default()).unwrap();
    let b = TrainingSet::build(&synthetic_catalog(), &FeatureConfig::default()).unwrap();

    assert_eq!(a.rows(), b.rows());
    assert_eq!(a.matrix(), b.matrix());
    assert_eq!(a.columns().names(), b.columns().names());
}
