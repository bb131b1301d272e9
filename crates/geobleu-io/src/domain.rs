//! Domain types for geobleu-io.

use std::collections::BTreeMap;

use geobleu_eval::StepRecord;
use serde::Serialize;

use crate::IoError;

/// A user identifier from the first column of a trajectory file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Uid(u64);

impl Uid {
    /// Wrap a raw uid.
    #[must_use]
    pub const fn new(uid: u64) -> Self {
        Self(uid)
    }

    /// Return the raw uid.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Uid {
    fn from(uid: u64) -> Self {
        Self(uid)
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trajectories keyed by uid, iterated in ascending uid order.
///
/// A uid may map to an empty trajectory: the reference reader registers
/// every uid it sees even when all of its steps fall before the prediction
/// window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectorySet {
    trajectories: BTreeMap<Uid, Vec<StepRecord>>,
}

impl TrajectorySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `uid` has an entry, possibly empty.
    pub fn register(&mut self, uid: Uid) {
        self.trajectories.entry(uid).or_default();
    }

    /// Append one step to `uid`'s trajectory, registering the uid if needed.
    pub fn push(&mut self, uid: Uid, record: StepRecord) {
        self.trajectories.entry(uid).or_default().push(record);
    }

    /// Iterate over uids in ascending order.
    pub fn uids(&self) -> impl Iterator<Item = Uid> + '_ {
        self.trajectories.keys().copied()
    }

    /// Return the trajectory recorded for `uid`.
    #[must_use]
    pub fn get(&self, uid: Uid) -> Option<&[StepRecord]> {
        self.trajectories.get(&uid).map(Vec::as_slice)
    }

    /// Iterate over `(uid, trajectory)` pairs in ascending uid order.
    pub fn iter(&self) -> impl Iterator<Item = (Uid, &[StepRecord])> + '_ {
        self.trajectories
            .iter()
            .map(|(&uid, steps)| (uid, steps.as_slice()))
    }

    /// Return the number of uids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    /// Return true if no uid is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Return the total number of steps across all uids.
    #[must_use]
    pub fn n_steps(&self) -> usize {
        self.trajectories.values().map(Vec::len).sum()
    }
}

impl FromIterator<(Uid, Vec<StepRecord>)> for TrajectorySet {
    fn from_iter<I: IntoIterator<Item = (Uid, Vec<StepRecord>)>>(iter: I) -> Self {
        Self {
            trajectories: iter.into_iter().collect(),
        }
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, IoError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobleu_eval::TimedStep;

    fn record(day: u32, time: u32) -> StepRecord {
        StepRecord::from(TimedStep::new(day, time, 1.0, 1.0))
    }

    #[test]
    fn uids_ascend_regardless_of_insertion() {
        let mut set = TrajectorySet::new();
        set.push(Uid::new(9), record(60, 0));
        set.push(Uid::new(3), record(60, 0));
        set.register(Uid::new(5));
        let uids: Vec<u64> = set.uids().map(Uid::get).collect();
        assert_eq!(uids, vec![3, 5, 9]);
    }

    #[test]
    fn registered_uid_is_empty_not_missing() {
        let mut set = TrajectorySet::new();
        set.register(Uid::new(7));
        assert_eq!(set.get(Uid::new(7)), Some(&[][..]));
        assert_eq!(set.get(Uid::new(8)), None);
        assert_eq!(set.n_steps(), 0);
    }

    #[test]
    fn register_keeps_existing_steps() {
        let mut set = TrajectorySet::new();
        set.push(Uid::new(1), record(60, 0));
        set.push(Uid::new(1), record(60, 1));
        set.register(Uid::new(1));
        assert_eq!(set.get(Uid::new(1)).map(<[_]>::len), Some(2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("humob-task1_v2").unwrap();
        assert_eq!(name.as_str(), "humob-task1_v2");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        assert!(matches!(
            ExperimentName::new(""),
            Err(IoError::InvalidExperimentName { .. })
        ));
    }

    #[test]
    fn experiment_name_rejects_path_separators() {
        assert!(matches!(
            ExperimentName::new("../out"),
            Err(IoError::InvalidExperimentName { .. })
        ));
    }
}
