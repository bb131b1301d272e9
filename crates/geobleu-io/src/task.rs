//! Per-task limits for submission files.

use std::ops::Range;

use crate::IoError;

/// Valid uid, day, time, and coordinate ranges for one prediction task.
///
/// Day, time, and coordinate bounds are inclusive; `uid_range` is half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Task identifier as given on the command line.
    pub id: &'static str,
    /// Uids that must appear in a submission.
    pub uid_range: Range<u64>,
    /// First predicted day.
    pub d_min: u64,
    /// Last predicted day.
    pub d_max: u64,
    /// First timeslot of a day.
    pub t_min: u64,
    /// Last timeslot of a day.
    pub t_max: u64,
    /// Smallest grid coordinate.
    pub coord_min: u64,
    /// Largest grid coordinate.
    pub coord_max: u64,
}

impl TaskSpec {
    const fn grid(id: &'static str, uid_range: Range<u64>) -> Self {
        Self {
            id,
            uid_range,
            d_min: 60,
            d_max: 74,
            t_min: 0,
            t_max: 47,
            coord_min: 1,
            coord_max: 200,
        }
    }

    /// Look up a task by id: `"1"`, `"2"`, or `"test"`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownTask`] for any other id.
    pub fn for_task(task: &str) -> Result<Self, IoError> {
        match task {
            "1" => Ok(Self::grid("1", 80_000..100_000)),
            "2" => Ok(Self::grid("2", 22_500..25_000)),
            "test" => Ok(Self::grid("test", 50..60)),
            other => Err(IoError::UnknownTask {
                task: other.to_string(),
            }),
        }
    }

    /// Return the number of uids a submission must contain.
    #[must_use]
    pub fn n_uids(&self) -> usize {
        (self.uid_range.end - self.uid_range.start) as usize
    }

    /// Return true if `uid` lies in the task's uid range.
    #[must_use]
    pub fn contains_uid(&self, uid: u64) -> bool {
        self.uid_range.contains(&uid)
    }
}
