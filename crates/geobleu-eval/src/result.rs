//! Result types for day-partitioned evaluation.

use serde::Serialize;

/// Score of one metric for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayScore {
    /// Calendar day.
    pub day: u32,
    /// Metric value for that day.
    pub value: f64,
}

/// Both metrics for one trajectory pair, averaged across days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryScores {
    /// Mean per-day GEO-BLEU (higher is better).
    pub geobleu: f64,
    /// Mean per-day DTW cost (lower is better).
    pub dtw: f64,
    /// Number of days averaged.
    pub n_days: usize,
}

/// Unweighted arithmetic mean of per-day values.
///
/// Every day counts once regardless of how many steps it holds.
#[must_use]
pub fn mean_over_days(scores: &[DayScore]) -> f64 {
    let sum: f64 = scores.iter().map(|s| s.value).sum();
    sum / scores.len() as f64
}
