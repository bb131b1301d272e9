//! Whole-submission consistency checks against a reference dataset.

use geobleu_eval::validate;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::{TrajectorySet, Uid};
use crate::task::TaskSpec;
use crate::IoError;

/// Counts reported for a submission that passed [`check_submission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    /// Number of uids checked.
    pub n_uids: usize,
    /// Number of submitted steps across all uids.
    pub n_steps: usize,
}

/// Check that a submission covers exactly the task's uids and that every
/// trajectory aligns step-for-step with its reference.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::UidSetMismatch`] | Submitted uids differ from the task's uid range |
/// | [`IoError::MissingReference`] | Reference has no entry for a task uid |
/// | [`IoError::Inconsistent`] | A uid fails trajectory validation; carries the cause |
#[instrument(skip_all, fields(task = task.id, n_uids = submission.len()))]
pub fn check_submission(
    submission: &TrajectorySet,
    reference: &TrajectorySet,
    task: &TaskSpec,
) -> Result<CheckSummary, IoError> {
    let missing: Vec<u64> = task
        .uid_range
        .clone()
        .filter(|&uid| submission.get(Uid::new(uid)).is_none())
        .collect();
    let extra: Vec<u64> = submission
        .uids()
        .map(Uid::get)
        .filter(|&uid| !task.contains_uid(uid))
        .collect();
    if !missing.is_empty() || !extra.is_empty() {
        warn!(n_missing = missing.len(), n_extra = extra.len(), "uid set mismatch");
        return Err(IoError::UidSetMismatch { missing, extra });
    }

    let mut n_steps = 0;
    for (uid, predicted) in submission.iter() {
        let answer = reference
            .get(uid)
            .ok_or(IoError::MissingReference { uid: uid.get() })?;
        validate(predicted, answer).map_err(|source| IoError::Inconsistent {
            uid: uid.get(),
            source,
        })?;
        n_steps += predicted.len();
    }

    info!(n_steps, "submission is consistent with reference");
    Ok(CheckSummary {
        n_uids: submission.len(),
        n_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobleu_eval::{EvalError, Side, StepRecord, TimedStep};

    fn identified(uid: u64, day: u32, time: u32) -> StepRecord {
        StepRecord::Identified {
            uid,
            step: TimedStep::new(day, time, 5.0, 5.0),
        }
    }

    fn full_set(task: &TaskSpec, times: &[u32]) -> TrajectorySet {
        task.uid_range
            .clone()
            .map(|uid| {
                let steps = times.iter().map(|&t| identified(uid, 60, t)).collect();
                (Uid::new(uid), steps)
            })
            .collect()
    }

    #[test]
    fn consistent_submission_passes() {
        let task = TaskSpec::for_task("test").unwrap();
        let sub = full_set(&task, &[0, 1, 2]);
        let reference = full_set(&task, &[2, 0, 1]);
        let summary = check_submission(&sub, &reference, &task).unwrap();
        assert_eq!(summary, CheckSummary { n_uids: 10, n_steps: 30 });
    }

    #[test]
    fn missing_and_extra_uids_are_listed() {
        let task = TaskSpec::for_task("test").unwrap();
        let reference = full_set(&task, &[0]);
        let sub: TrajectorySet = full_set(&task, &[0])
            .iter()
            .filter(|(uid, _)| uid.get() != 53)
            .map(|(uid, steps)| (uid, steps.to_vec()))
            .chain([(Uid::new(60), vec![identified(60, 60, 0)])])
            .collect();
        let err = check_submission(&sub, &reference, &task).unwrap_err();
        match err {
            IoError::UidSetMismatch { missing, extra } => {
                assert_eq!(missing, vec![53]);
                assert_eq!(extra, vec![60]);
            }
            other => panic!("expected UidSetMismatch, got {other:?}"),
        }
    }

    #[test]
    fn length_mismatch_names_the_uid() {
        let task = TaskSpec::for_task("test").unwrap();
        let reference = full_set(&task, &[0, 1]);
        let mut sub = full_set(&task, &[0, 1]);
        sub.push(Uid::new(57), identified(57, 60, 2));
        let err = check_submission(&sub, &reference, &task).unwrap_err();
        assert!(matches!(
            err,
            IoError::Inconsistent {
                uid: 57,
                source: EvalError::LengthMismatch { sys_len: 3, ref_len: 2 },
            }
        ));
    }

    #[test]
    fn key_mismatch_names_the_uid() {
        let task = TaskSpec::for_task("test").unwrap();
        let reference = full_set(&task, &[0, 1]);
        let sub: TrajectorySet = reference
            .iter()
            .map(|(uid, steps)| {
                let steps = if uid.get() == 57 {
                    vec![identified(57, 60, 0), identified(57, 60, 2)]
                } else {
                    steps.to_vec()
                };
                (uid, steps)
            })
            .collect();
        let err = check_submission(&sub, &reference, &task).unwrap_err();
        assert!(matches!(
            err,
            IoError::Inconsistent {
                uid: 57,
                source: EvalError::KeyMismatch {
                    index: 1,
                    sys_day: 60,
                    sys_time: 2,
                    ref_day: 60,
                    ref_time: 1,
                },
            }
        ));
    }

    #[test]
    fn registered_but_empty_reference_is_inconsistent() {
        let task = TaskSpec::for_task("test").unwrap();
        let sub = full_set(&task, &[0]);
        let mut reference = full_set(&task, &[0]);
        reference = reference
            .iter()
            .map(|(uid, steps)| {
                let steps = if uid.get() == 50 { Vec::new() } else { steps.to_vec() };
                (uid, steps)
            })
            .collect();
        let err = check_submission(&sub, &reference, &task).unwrap_err();
        assert!(matches!(
            err,
            IoError::Inconsistent {
                uid: 50,
                source: EvalError::EmptyTrajectory { side: Side::Reference },
            }
        ));
    }

    #[test]
    fn missing_reference_uid() {
        let task = TaskSpec::for_task("test").unwrap();
        let sub = full_set(&task, &[0]);
        let reference: TrajectorySet = full_set(&task, &[0])
            .iter()
            .filter(|(uid, _)| uid.get() != 59)
            .map(|(uid, steps)| (uid, steps.to_vec()))
            .collect();
        let err = check_submission(&sub, &reference, &task).unwrap_err();
        assert!(matches!(err, IoError::MissingReference { uid: 59 }));
    }
}
