//! Trait definitions for comparison strategies.

use super::MatchType;

/// Strategy trait for deciding whether two fingerprints are duplicates
pub trait ComparisonStrategy: Send + Sync {
    /// Determine if a Hamming distance counts as a duplicate
    fn is_duplicate(&self, distance: u32) -> bool;

    /// Classify the match type based on distance
    fn classify(&self, distance: u32) -> MatchType;

    /// Get the threshold used
    fn threshold(&self) -> u32;
}

/// Simple threshold-based comparison strategy.
///
/// The threshold is a fixed configuration constant for the whole intake
/// pipeline, never negotiated per call.
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    /// Maximum distance to consider as duplicate
    threshold: u32,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    ///
    /// Recommended thresholds:
    /// - 5: Conservative, few false positives (blocks fewer legit earners)
    /// - 8: Balanced (default)
    /// - 10: Permissive, catches more lightly edited re-uploads
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Create a conservative strategy (threshold = 5)
    pub fn conservative() -> Self {
        Self::new(5)
    }

    /// Create a balanced strategy (threshold = 8)
    pub fn balanced() -> Self {
        Self::new(8)
    }

    /// Create a permissive strategy (threshold = 10)
    pub fn permissive() -> Self {
        Self::new(10)
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_duplicate(&self, distance: u32) -> bool {
        distance <= self.threshold
    }

    fn classify(&self, distance: u32) -> MatchType {
        MatchType::from_distance(distance)
    }

    fn threshold(&self) -> u32 {
        self.threshold
    }
}
