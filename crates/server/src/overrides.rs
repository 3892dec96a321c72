//! Genre rules applied on top of the model's answer.
//!
//! Checked in order, first match wins, case-insensitive on the primary
//! genre:
//! 1. Kids / family genres are always `KidsYoung`
//! 2. Horror and thriller are always `AdultMature`
//! 3. Light genres downgrade an `AdultMature` prediction to `TeenFamily`

use pipeline::RatingBucket;

const KIDS_GENRES: [&str; 4] = ["ANIMATION", "KIDS", "CHILDREN", "FAMILY"];
const HIGH_RISK_GENRES: [&str; 2] = ["HORROR", "THRILLER"];
const LOW_RISK_GENRES: [&str; 3] = ["COMEDY", "ROMANCE", "DOCUMENTARY"];

/// The bucket forced by the genre rules, if any
pub fn genre_override(primary_genre: &str, predicted: RatingBucket) -> Option<RatingBucket> {
    let genre = primary_genre.to_uppercase();
    let genre = genre.as_str();

    if KIDS_GENRES.contains(&genre) {
        Some(RatingBucket::KidsYoung)
    } else if HIGH_RISK_GENRES.contains(&genre) {
        Some(RatingBucket::AdultMature)
    } else if LOW_RISK_GENRES.contains(&genre) && predicted == RatingBucket::AdultMature {
        Some(RatingBucket::TeenFamily)
    } else {
        None
    }
}

/// Final bucket after the genre rules
pub fn apply_overrides(primary_genre: &str, predicted: RatingBucket) -> RatingBucket {
    genre_override(primary_genre, predicted).unwrap_or(predicted)
}
