//! Day-partitioned GEO-BLEU and DTW evaluation of a trajectory pair.

use geobleu_metrics::{Dtw, GeoBleu, Point, PointSeriesView};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::EvalError;
use crate::partition::{DayPartition, partition_by_day};
use crate::result::{DayScore, TrajectoryScores, mean_over_days};
use crate::trajectory::{StepRecord, validate};

/// Configuration for scoring a system trajectory against a reference.
///
/// Construct via [`Evaluator::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter  | Default                           |
/// |------------|-----------------------------------|
/// | `geobleu`  | `GeoBleu::default()` (n=3, β=0.5) |
/// | `dtw`      | `Dtw::default()` (scale 1.0)      |
/// | `parallel` | true                              |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluator {
    geobleu: GeoBleu,
    dtw: Dtw,
    parallel: bool,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            geobleu: GeoBleu::default(),
            dtw: Dtw::default(),
            parallel: true,
        }
    }
}

/// One day's pair of point lists.
struct DayPair<'a> {
    day: u32,
    sys: &'a [Point],
    reference: &'a [Point],
}

impl Evaluator {
    /// Create an evaluator with default metric parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the GEO-BLEU scorer.
    #[must_use]
    pub fn with_geobleu(mut self, geobleu: GeoBleu) -> Self {
        self.geobleu = geobleu;
        self
    }

    /// Set the DTW scorer.
    #[must_use]
    pub fn with_dtw(mut self, dtw: Dtw) -> Self {
        self.dtw = dtw;
        self
    }

    /// Score days on the rayon pool (`true`) or on the calling thread.
    ///
    /// Both paths collect in ascending day order, so the mean is identical.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Return the GEO-BLEU scorer.
    #[must_use]
    pub fn geobleu_scorer(&self) -> GeoBleu {
        self.geobleu
    }

    /// Return the DTW scorer.
    #[must_use]
    pub fn dtw_scorer(&self) -> Dtw {
        self.dtw
    }

    /// Return whether days are scored in parallel.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Mean per-day GEO-BLEU of `sys` against `reference`.
    ///
    /// # Errors
    ///
    /// Any [`EvalError`] from [`validate`], [`EvalError::MissingDay`], or
    /// [`EvalError::Metric`] for a day holding a non-finite coordinate.
    #[instrument(level = "debug", skip_all, fields(n_steps = sys.len()))]
    pub fn geobleu(&self, sys: &[StepRecord], reference: &[StepRecord]) -> Result<f64, EvalError> {
        let scores = self.geobleu_by_day(sys, reference)?;
        let mean = mean_over_days(&scores);
        debug!(n_days = scores.len(), mean, "geo-bleu averaged across days");
        Ok(mean)
    }

    /// Mean per-day DTW cost of `sys` against `reference`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Evaluator::geobleu`].
    #[instrument(level = "debug", skip_all, fields(n_steps = sys.len()))]
    pub fn dtw(&self, sys: &[StepRecord], reference: &[StepRecord]) -> Result<f64, EvalError> {
        let scores = self.dtw_by_day(sys, reference)?;
        let mean = mean_over_days(&scores);
        debug!(n_days = scores.len(), mean, "dtw averaged across days");
        Ok(mean)
    }

    /// Per-day GEO-BLEU scores in ascending day order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Evaluator::geobleu`].
    pub fn geobleu_by_day(
        &self,
        sys: &[StepRecord],
        reference: &[StepRecord],
    ) -> Result<Vec<DayScore>, EvalError> {
        let (sys_days, ref_days) = prepare(sys, reference)?;
        let geobleu = self.geobleu;
        self.per_day(&sys_days, &ref_days, |s, r| geobleu.score(s, r).value())
    }

    /// Per-day DTW costs in ascending day order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Evaluator::geobleu`].
    pub fn dtw_by_day(
        &self,
        sys: &[StepRecord],
        reference: &[StepRecord],
    ) -> Result<Vec<DayScore>, EvalError> {
        let (sys_days, ref_days) = prepare(sys, reference)?;
        let dtw = self.dtw;
        self.per_day(&sys_days, &ref_days, |s, r| dtw.distance(s, r).value())
    }

    /// Validate once and compute both metrics.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Evaluator::geobleu`].
    #[instrument(level = "debug", skip_all, fields(n_steps = sys.len()))]
    pub fn evaluate(
        &self,
        sys: &[StepRecord],
        reference: &[StepRecord],
    ) -> Result<TrajectoryScores, EvalError> {
        let (sys_days, ref_days) = prepare(sys, reference)?;
        let geobleu = self.geobleu;
        let dtw = self.dtw;
        let geobleu_days =
            self.per_day(&sys_days, &ref_days, |s, r| geobleu.score(s, r).value())?;
        let dtw_days = self.per_day(&sys_days, &ref_days, |s, r| dtw.distance(s, r).value())?;

        Ok(TrajectoryScores {
            geobleu: mean_over_days(&geobleu_days),
            dtw: mean_over_days(&dtw_days),
            n_days: ref_days.len(),
        })
    }

    /// Score every day of the reference partition.
    ///
    /// Days present only in the system partition are ignored.
    fn per_day<F>(
        &self,
        sys: &DayPartition,
        reference: &DayPartition,
        score: F,
    ) -> Result<Vec<DayScore>, EvalError>
    where
        F: Fn(PointSeriesView<'_>, PointSeriesView<'_>) -> f64 + Sync,
    {
        let pairs = reference
            .iter()
            .map(|(day, ref_points)| {
                sys.get(day)
                    .map(|sys_points| DayPair {
                        day,
                        sys: sys_points,
                        reference: ref_points,
                    })
                    .ok_or(EvalError::MissingDay { day })
            })
            .collect::<Result<Vec<_>, EvalError>>()?;

        if self.parallel {
            pairs.par_iter().map(|pair| score_pair(pair, &score)).collect()
        } else {
            pairs.iter().map(|pair| score_pair(pair, &score)).collect()
        }
    }
}

fn prepare(
    sys: &[StepRecord],
    reference: &[StepRecord],
) -> Result<(DayPartition, DayPartition), EvalError> {
    let (sys_steps, ref_steps) = validate(sys, reference)?;
    Ok((partition_by_day(&sys_steps), partition_by_day(&ref_steps)))
}

fn score_pair<F>(pair: &DayPair<'_>, score: &F) -> Result<DayScore, EvalError>
where
    F: Fn(PointSeriesView<'_>, PointSeriesView<'_>) -> f64,
{
    let sys = PointSeriesView::new(pair.sys)?;
    let reference = PointSeriesView::new(pair.reference)?;
    Ok(DayScore {
        day: pair.day,
        value: score(sys, reference),
    })
}

/// Mean per-day GEO-BLEU with default parameters (n=3, β=0.5).
///
/// # Errors
///
/// Same conditions as [`Evaluator::geobleu`].
pub fn calc_geobleu(sys: &[StepRecord], reference: &[StepRecord]) -> Result<f64, EvalError> {
    Evaluator::default().geobleu(sys, reference)
}

/// Mean per-day DTW cost with unit distance scale.
///
/// # Errors
///
/// Same conditions as [`Evaluator::geobleu`].
pub fn calc_dtw(sys: &[StepRecord], reference: &[StepRecord]) -> Result<f64, EvalError> {
    Evaluator::default().dtw(sys, reference)
}
