//! Audience rating buckets.
//!
//! Raw rating codes ("TV-MA", "PG-13", "TV-Y7-FV", ...) are collapsed into
//! three ordered buckets. These bucket labels are also the strings the
//! HTTP API returns, so their spelling is part of the public contract.

use std::fmt;

/// Rating codes that map to [`RatingBucket::AdultMature`]
const ADULT_CODES: [&str; 6] = ["TV-MA", "R", "NC-17", "UR", "NR", "A"];

/// Rating codes that map to [`RatingBucket::TeenFamily`]
const TEEN_CODES: [&str; 9] = [
    "PG-13", "PG", "TV-PG", "TV-14", "TV-G", "G", "TV-Y7", "TV-Y7-FV", "M",
];

/// Simplified audience rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RatingBucket {
    AdultMature,
    TeenFamily,
    KidsYoung,
}

impl RatingBucket {
    /// All buckets, strictest first
    pub const ALL: [RatingBucket; 3] = [
        RatingBucket::AdultMature,
        RatingBucket::TeenFamily,
        RatingBucket::KidsYoung,
    ];

    /// Map a raw rating code to its bucket.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything not recognised as adult or teen (including junk values such
    /// as "74 min" that leak into the rating column) counts as kids.
    pub fn from_rating(raw: &str) -> Self {
        let code = raw.trim().to_uppercase();
        if ADULT_CODES.contains(&code.as_str()) {
            RatingBucket::AdultMature
        } else if TEEN_CODES.contains(&code.as_str()) {
            RatingBucket::TeenFamily
        } else {
            RatingBucket::KidsYoung
        }
    }

    /// Human-readable label returned by the API
    pub fn label(&self) -> &'static str {
        match self {
            RatingBucket::AdultMature => "Adult_Mature (TV-MA / R)",
            RatingBucket::TeenFamily => "Teen_Family (PG-13 / TV-14)",
            RatingBucket::KidsYoung => "Kids_Young (TV-Y / G)",
        }
    }

    /// Reverse of [`RatingBucket::label`]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.label() == label)
    }
}

impl fmt::Display for RatingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adult_codes() {
        for code in ["TV-MA", "R", "nc-17", " UR ", "NR", "A"] {
            assert_eq!(RatingBucket::from_rating(code), RatingBucket::AdultMature, "{code}");
        }
    }

    #[test]
    fn test_teen_codes() {
        for code in ["PG-13", "PG", "TV-PG", "TV-14", "TV-G", "G", "TV-Y7", "TV-Y7-FV", "M"] {
            assert_eq!(RatingBucket::from_rating(code), RatingBucket::TeenFamily, "{code}");
        }
    }

    #[test]
    fn test_everything_else_is_kids() {
        for code in ["TV-Y", "74 min", "", "unrated"] {
            assert_eq!(RatingBucket::from_rating(code), RatingBucket::KidsYoung, "{code}");
        }
    }

    #[test]
    fn test_label_roundtrip() {
        for bucket in RatingBucket::ALL {
            assert_eq!(RatingBucket::from_label(bucket.label()), Some(bucket));
        }
        assert_eq!(RatingBucket::from_label("Adult"), None);
    }
}
