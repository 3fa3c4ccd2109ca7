//! Matching thresholds.

use serde::{Deserialize, Serialize};

/// Minimum score a best candidate needs to be returned as a match.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.5;

/// Threshold handed to [`similar`](crate::similar) when comparing streets.
pub const STREET_SIMILARITY: f64 = 0.7;

/// The substring fallback only applies when the shorter string is longer
/// than this many characters.
pub const FALLBACK_MIN_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub acceptance_threshold: f64,
    pub street_similarity: f64,
    pub fallback_min_len: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: ACCEPTANCE_THRESHOLD,
            street_similarity: STREET_SIMILARITY,
            fallback_min_len: FALLBACK_MIN_LEN,
        }
    }
}

impl MatchConfig {
    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }
}
