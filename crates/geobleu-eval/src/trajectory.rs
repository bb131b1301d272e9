//! Timed steps, raw step records, and trajectory validation.

use geobleu_metrics::Point;
use tracing::{debug, instrument};

use crate::error::{EvalError, Side};

/// One observation: a location at a (day, timeslot) key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedStep {
    /// Calendar day index.
    pub day: u32,
    /// Timeslot within the day.
    pub time: u32,
    /// Visited location.
    pub point: Point,
}

impl TimedStep {
    /// Create a new step.
    #[must_use]
    pub const fn new(day: u32, time: u32, x: f64, y: f64) -> Self {
        Self {
            day,
            time,
            point: Point::new(x, y),
        }
    }

    /// Return the `(day, time)` key used for ordering and alignment.
    #[must_use]
    pub fn key(&self) -> (u32, u32) {
        (self.day, self.time)
    }
}

/// A step as supplied by a caller, with or without a leading entity id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepRecord {
    /// `(day, time, x, y)`.
    Anonymous(TimedStep),
    /// `(uid, day, time, x, y)`. The uid is dropped before scoring.
    Identified {
        /// Entity identifier.
        uid: u64,
        /// The step itself.
        step: TimedStep,
    },
}

impl StepRecord {
    /// Parse a raw row of 4 or 5 numeric columns.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvalError::UnsupportedColumnCount`] | `columns.len()` is not 4 or 5 |
    /// | [`EvalError::NonIntegralKey`] | uid, day, or time is not a non-negative integer |
    pub fn from_columns(columns: &[f64]) -> Result<Self, EvalError> {
        match *columns {
            [day, time, x, y] => Ok(Self::Anonymous(TimedStep::new(
                key_u32("day", day)?,
                key_u32("time", time)?,
                x,
                y,
            ))),
            [uid, day, time, x, y] => Ok(Self::Identified {
                uid: key_u64("uid", uid)?,
                step: TimedStep::new(key_u32("day", day)?, key_u32("time", time)?, x, y),
            }),
            _ => Err(EvalError::UnsupportedColumnCount { got: columns.len() }),
        }
    }

    /// Return the number of columns this record was built from.
    #[must_use]
    pub fn column_count(&self) -> usize {
        match self {
            Self::Anonymous(_) => 4,
            Self::Identified { .. } => 5,
        }
    }

    /// Return the step without its identifier.
    #[must_use]
    pub fn step(&self) -> TimedStep {
        match *self {
            Self::Anonymous(step) | Self::Identified { step, .. } => step,
        }
    }

    /// Return the entity identifier, if present.
    #[must_use]
    pub fn uid(&self) -> Option<u64> {
        match *self {
            Self::Anonymous(_) => None,
            Self::Identified { uid, .. } => Some(uid),
        }
    }
}

impl From<TimedStep> for StepRecord {
    fn from(step: TimedStep) -> Self {
        Self::Anonymous(step)
    }
}

fn key_u64(column: &'static str, value: f64) -> Result<u64, EvalError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(EvalError::NonIntegralKey { column, value })
    }
}

fn key_u32(column: &'static str, value: f64) -> Result<u32, EvalError> {
    let wide = key_u64(column, value)?;
    u32::try_from(wide).map_err(|_| EvalError::NonIntegralKey { column, value })
}

fn column_count(records: &[StepRecord], side: Side) -> Result<usize, EvalError> {
    let expected = records[0].column_count();
    match records.iter().position(|r| r.column_count() != expected) {
        Some(index) => Err(EvalError::InconsistentColumns {
            side,
            index,
            expected,
            got: records[index].column_count(),
        }),
        None => Ok(expected),
    }
}

/// Check that two trajectories describe the same observation grid.
///
/// Strips any uid column and returns both trajectories sorted by
/// `(day, time)`. The sort is stable, so steps sharing a key keep their
/// input order.
///
/// # Errors
///
/// Checks run in this order; the first failure is returned.
///
/// | Variant | Condition |
/// |---|---|
/// | [`EvalError::EmptyTrajectory`] | Either trajectory has no steps |
/// | [`EvalError::LengthMismatch`] | Lengths differ |
/// | [`EvalError::InconsistentColumns`] | A trajectory mixes 4- and 5-column records |
/// | [`EvalError::ColumnCountMismatch`] | The trajectories use different column counts |
/// | [`EvalError::KeyMismatch`] | Sorted `(day, time)` keys differ at some index |
#[instrument(level = "debug", skip_all, fields(sys_len = sys.len(), ref_len = reference.len()))]
pub fn validate(
    sys: &[StepRecord],
    reference: &[StepRecord],
) -> Result<(Vec<TimedStep>, Vec<TimedStep>), EvalError> {
    if sys.is_empty() {
        return Err(EvalError::EmptyTrajectory { side: Side::System });
    }
    if reference.is_empty() {
        return Err(EvalError::EmptyTrajectory {
            side: Side::Reference,
        });
    }
    if sys.len() != reference.len() {
        return Err(EvalError::LengthMismatch {
            sys_len: sys.len(),
            ref_len: reference.len(),
        });
    }

    let sys_cols = column_count(sys, Side::System)?;
    let ref_cols = column_count(reference, Side::Reference)?;
    if sys_cols != ref_cols {
        return Err(EvalError::ColumnCountMismatch {
            sys: sys_cols,
            reference: ref_cols,
        });
    }

    let mut sys_steps: Vec<TimedStep> = sys.iter().map(StepRecord::step).collect();
    let mut ref_steps: Vec<TimedStep> = reference.iter().map(StepRecord::step).collect();
    sys_steps.sort_by_key(TimedStep::key);
    ref_steps.sort_by_key(TimedStep::key);

    for (index, (s, r)) in sys_steps.iter().zip(&ref_steps).enumerate() {
        if s.key() != r.key() {
            return Err(EvalError::KeyMismatch {
                index,
                sys_day: s.day,
                sys_time: s.time,
                ref_day: r.day,
                ref_time: r.time,
            });
        }
    }

    debug!(n_steps = sys_steps.len(), columns = sys_cols, "trajectories validated");
    Ok((sys_steps, ref_steps))
}
