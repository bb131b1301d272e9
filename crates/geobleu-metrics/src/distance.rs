//! Score newtypes returned by the trajectory scorers.

use std::cmp::Ordering;
use std::fmt;

/// Cumulative DTW alignment cost. Lower is better; zero for identical sequences.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DtwDistance(f64);

impl DtwDistance {
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for DtwDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// GEO-BLEU similarity in `[0, 1]`. Higher is better; 1.0 is a perfect match.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct GeoBleuScore(f64);

impl GeoBleuScore {
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw score value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for GeoBleuScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
