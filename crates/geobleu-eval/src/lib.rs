//! Day-partitioned GEO-BLEU and DTW evaluation of trajectory pairs.
//!
//! Validates that a predicted and a reference trajectory share the same
//! (day, timeslot) grid, splits both by day, scores each day independently,
//! and averages the per-day results.

mod error;
mod evaluator;
mod partition;
mod result;
mod trajectory;

pub use error::{EvalError, Side};
pub use evaluator::{Evaluator, calc_dtw, calc_geobleu};
pub use geobleu_metrics::Point;
pub use partition::{DayPartition, partition_by_day};
pub use result::{DayScore, TrajectoryScores, mean_over_days};
pub use trajectory::{StepRecord, TimedStep, validate};
