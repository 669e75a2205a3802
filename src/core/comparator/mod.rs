//! # Comparator Module
//!
//! Decides whether two fingerprints represent the same screenshot.
//!
//! ## How It Works
//! 1. Compute the Hamming distance between two fingerprints
//! 2. Apply the comparison strategy's threshold
//! 3. Classify the match for logging and rejection messages
//!
//! ## Comparison Thresholds
//! | Distance | Classification |
//! |----------|---------------|
//! | 0        | Exact match   |
//! | 1-4      | Near-exact    |
//! | 5-10     | Similar       |
//! | 11+      | Possibly similar |
//!
//! Incomparable fingerprints (malformed text, mismatched algorithm or
//! length) surface a [`CompareError`](crate::error::CompareError) instead
//! of a silent "not similar"; the scanner decides the fail-open policy.

mod traits;

pub use traits::{ComparisonStrategy, ThresholdStrategy};

use serde::{Deserialize, Serialize};

/// Classification of match types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Distance = 0, identical perceptual content
    Exact,
    /// Distance 1-4, virtually identical
    NearExact,
    /// Distance 5-10, likely duplicates
    Similar,
    /// Distance 11-15, possibly related
    MaybeSimilar,
}

impl MatchType {
    /// Classify based on Hamming distance
    pub fn from_distance(distance: u32) -> Self {
        match distance {
            0 => MatchType::Exact,
            1..=4 => MatchType::NearExact,
            5..=10 => MatchType::Similar,
            _ => MatchType::MaybeSimilar,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "Exact Match"),
            MatchType::NearExact => write!(f, "Near-Exact Match"),
            MatchType::Similar => write!(f, "Similar"),
            MatchType::MaybeSimilar => write!(f, "Possibly Similar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::{Fingerprint, HashAlgorithmKind};

    #[test]
    fn match_type_boundaries() {
        assert_eq!(MatchType::from_distance(0), MatchType::Exact);
        assert_eq!(MatchType::from_distance(1), MatchType::NearExact);
        assert_eq!(MatchType::from_distance(4), MatchType::NearExact);
        assert_eq!(MatchType::from_distance(5), MatchType::Similar);
        assert_eq!(MatchType::from_distance(10), MatchType::Similar);
        assert_eq!(MatchType::from_distance(11), MatchType::MaybeSimilar);
    }

    #[test]
    fn strategy_and_distance_agree_on_identical_fingerprints() {
        let a = Fingerprint::new(vec![0xAB, 0xCD], HashAlgorithmKind::Difference);
        let strategy = ThresholdStrategy::default();

        let distance = a.distance(&a).unwrap();
        assert_eq!(distance, 0);
        assert!(strategy.is_duplicate(distance));
        assert_eq!(strategy.classify(distance), MatchType::Exact);
    }
}
