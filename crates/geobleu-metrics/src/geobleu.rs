//! GEO-BLEU: BLEU-style geographic precision over n-gram proximity matches.

use tracing::{instrument, trace};

use crate::distance::GeoBleuScore;
use crate::error::MetricError;
use crate::ngram::precision_at_n;
use crate::series::PointSeriesView;

/// Default maximum n-gram order.
pub const DEFAULT_MAX_N: usize = 3;

/// Default proximity decay rate.
pub const DEFAULT_BETA: f64 = 0.5;

/// Immutable GEO-BLEU configuration. Thread-safe and copyable.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `max_n`   | 3       |
/// | `beta`    | 0.5     |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBleu {
    max_n: usize,
    beta: f64,
}

impl Default for GeoBleu {
    fn default() -> Self {
        Self {
            max_n: DEFAULT_MAX_N,
            beta: DEFAULT_BETA,
        }
    }
}

/// Intermediate terms of a GEO-BLEU computation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBleuBreakdown {
    /// Greedy-matching precision for n = 1..=effective max_n.
    pub precisions: Vec<f64>,
    /// Multiplicative penalty for a system sequence not longer than the reference.
    pub brevity_penalty: f64,
    /// Final score: brevity penalty times geometric mean of `precisions`.
    pub score: GeoBleuScore,
}

impl GeoBleu {
    /// Create a GEO-BLEU scorer.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::InvalidMaxN`] | `max_n` is zero |
    /// | [`MetricError::InvalidBeta`] | `beta` is NaN, infinite, or not positive |
    pub fn new(max_n: usize, beta: f64) -> Result<Self, MetricError> {
        if max_n == 0 {
            return Err(MetricError::InvalidMaxN { max_n });
        }
        if !beta.is_finite() || beta <= 0.0 {
            return Err(MetricError::InvalidBeta { beta });
        }
        Ok(Self { max_n, beta })
    }

    /// Return the configured maximum n-gram order.
    #[must_use]
    pub fn max_n(&self) -> usize {
        self.max_n
    }

    /// Return the proximity decay rate.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Score a system sequence against a reference sequence.
    #[must_use]
    pub fn score(&self, sys: PointSeriesView<'_>, reference: PointSeriesView<'_>) -> GeoBleuScore {
        self.score_detailed(sys, reference).score
    }

    /// Score a system sequence and return every intermediate term.
    ///
    /// The n-gram order is clamped to the shorter sequence's length, so every
    /// precision term is defined.
    #[must_use]
    #[instrument(level = "trace", skip_all, fields(sys_len = sys.len(), ref_len = reference.len()))]
    pub fn score_detailed(
        &self,
        sys: PointSeriesView<'_>,
        reference: PointSeriesView<'_>,
    ) -> GeoBleuBreakdown {
        let max_n = self.max_n.min(sys.len()).min(reference.len());

        // Clamping keeps every order within both lengths, so each term is Some.
        let precisions: Vec<f64> = (1..=max_n)
            .filter_map(|n| precision_at_n(sys.as_slice(), reference.as_slice(), n, self.beta))
            .collect();
        debug_assert_eq!(precisions.len(), max_n);

        let brevity_penalty = brevity_penalty(sys.len(), reference.len());
        let score = brevity_penalty * geometric_mean(&precisions);
        trace!(?precisions, brevity_penalty, score, "geo-bleu terms");

        GeoBleuBreakdown {
            precisions,
            brevity_penalty,
            score: GeoBleuScore::new(score),
        }
    }
}

/// 1.0 when the system sequence is strictly longer than the reference,
/// otherwise `exp(1 - ref_len / sys_len)`.
///
/// A zero `sys_len` yields 0.0 when `ref_len` is positive and NaN when both
/// are zero. Validated point series never reach either case.
#[must_use]
pub fn brevity_penalty(sys_len: usize, ref_len: usize) -> f64 {
    if sys_len > ref_len {
        1.0
    } else {
        (1.0 - ref_len as f64 / sys_len as f64).exp()
    }
}

/// Geometric mean computed as `exp(mean(ln v))`.
///
/// Any zero term drives the mean to 0.0. This differs from a masked
/// geometric mean, which would skip zero terms; a zero precision only arises
/// when `exp(-beta * d)` underflows. An empty slice has no mean and yields NaN.
#[must_use]
pub fn geometric_mean(values: &[f64]) -> f64 {
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    (log_sum / values.len() as f64).exp()
}
