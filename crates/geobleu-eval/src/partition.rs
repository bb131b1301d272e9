//! Grouping of a validated trajectory's points by calendar day.

use std::collections::BTreeMap;

use geobleu_metrics::Point;

use crate::trajectory::TimedStep;

/// Day → ordered points visited that day.
///
/// Backed by a `BTreeMap`, so iteration runs in ascending day order and is
/// reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayPartition(BTreeMap<u32, Vec<Point>>);

impl DayPartition {
    /// Return the days present, ascending.
    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    /// Return the points visited on `day`, in time order.
    #[must_use]
    pub fn get(&self, day: u32) -> Option<&[Point]> {
        self.0.get(&day).map(Vec::as_slice)
    }

    /// Iterate over `(day, points)` pairs in ascending day order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Point])> + '_ {
        self.0.iter().map(|(&day, points)| (day, points.as_slice()))
    }

    /// Return the number of days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if no day is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Group steps by day, preserving their order within each day.
///
/// Callers pass a trajectory sorted by `(day, time)`, so within-day order
/// is time order.
#[must_use]
pub fn partition_by_day(steps: &[TimedStep]) -> DayPartition {
    let mut days: BTreeMap<u32, Vec<Point>> = BTreeMap::new();
    for step in steps {
        days.entry(step.day).or_default().push(step.point);
    }
    DayPartition(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_preserves_order() {
        let steps = [
            TimedStep::new(60, 0, 1.0, 1.0),
            TimedStep::new(60, 1, 2.0, 2.0),
            TimedStep::new(62, 0, 3.0, 3.0),
            TimedStep::new(60, 2, 4.0, 4.0),
        ];
        let p = partition_by_day(&steps);
        assert_eq!(p.len(), 2);
        assert_eq!(p.days().collect::<Vec<_>>(), vec![60, 62]);
        assert_eq!(
            p.get(60).unwrap(),
            &[Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(4.0, 4.0)]
        );
        assert_eq!(p.get(62).unwrap(), &[Point::new(3.0, 3.0)]);
        assert!(p.get(61).is_none());
    }

    #[test]
    fn empty_input_gives_empty_partition() {
        assert!(partition_by_day(&[]).is_empty());
    }
}
