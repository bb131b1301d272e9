//! Error types for trajectory validation and day-partitioned evaluation.

use std::fmt;

use geobleu_metrics::MetricError;

/// Which of the two trajectories an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The predicted (generated) trajectory.
    System,
    /// The ground-truth trajectory.
    Reference,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::Reference => f.write_str("reference"),
        }
    }
}

/// Errors from trajectory validation and scoring. All are fatal to the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Returned when a trajectory has no steps.
    #[error("{side} trajectory is empty")]
    EmptyTrajectory {
        /// The empty trajectory.
        side: Side,
    },

    /// Returned when the two trajectories differ in length.
    #[error("trajectory lengths differ: system has {sys_len} steps, reference has {ref_len}")]
    LengthMismatch {
        /// Number of system steps.
        sys_len: usize,
        /// Number of reference steps.
        ref_len: usize,
    },

    /// Returned when a raw row has neither 4 nor 5 columns.
    #[error("unsupported column count {got}: expected 4 (day, time, x, y) or 5 (uid, day, time, x, y)")]
    UnsupportedColumnCount {
        /// Number of columns in the row.
        got: usize,
    },

    /// Returned when a uid, day, or time cell is not a non-negative integer.
    #[error("{column} must be a non-negative integer, got {value}")]
    NonIntegralKey {
        /// Name of the offending column.
        column: &'static str,
        /// The raw value.
        value: f64,
    },

    /// Returned when steps within one trajectory mix 4- and 5-column records.
    #[error("{side} trajectory mixes column counts: step {index} has {got} columns, expected {expected}")]
    InconsistentColumns {
        /// The offending trajectory.
        side: Side,
        /// Zero-based index of the first step that differs from step 0.
        index: usize,
        /// Column count of step 0.
        expected: usize,
        /// Column count of the offending step.
        got: usize,
    },

    /// Returned when one trajectory carries a uid column and the other does not.
    #[error("column counts differ: system has {sys} columns, reference has {reference}")]
    ColumnCountMismatch {
        /// System column count.
        sys: usize,
        /// Reference column count.
        reference: usize,
    },

    /// Returned when the sorted (day, time) keys differ at some step.
    #[error(
        "day and time differ at step {index}: (d, t) = ({sys_day}, {sys_time}) for system, ({ref_day}, {ref_time}) for reference"
    )]
    KeyMismatch {
        /// Zero-based index into the sorted trajectories.
        index: usize,
        /// System day at `index`.
        sys_day: u32,
        /// System timeslot at `index`.
        sys_time: u32,
        /// Reference day at `index`.
        ref_day: u32,
        /// Reference timeslot at `index`.
        ref_time: u32,
    },

    /// Returned when a day present in the reference partition is absent from the system partition.
    #[error("day {day} is present in the reference but missing from the system trajectory")]
    MissingDay {
        /// The missing day.
        day: u32,
    },

    /// Wraps a metric error raised while building per-day point series.
    #[error("metric error: {0}")]
    Metric(#[from] MetricError),
}
