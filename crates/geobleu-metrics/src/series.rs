//! Point and point-series types with validation guarantees.

use std::ops::Index;

use crate::error::MetricError;

/// A location on the 2-D grid. No identity beyond its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return true if both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

fn check_points(points: &[Point]) -> Result<(), MetricError> {
    if points.is_empty() {
        return Err(MetricError::EmptySeries);
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(MetricError::NonFiniteCoordinate { index });
    }
    Ok(())
}

/// Owned, validated point series. Guaranteed non-empty with all coordinates finite.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries(Vec<Point>);

impl PointSeries {
    /// Create a new point series, validating that it is non-empty and finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::EmptySeries`] | `points` is empty |
    /// | [`MetricError::NonFiniteCoordinate`] | Any coordinate is NaN or infinite |
    pub fn new(points: Vec<Point>) -> Result<Self, MetricError> {
        check_points(&points)?;
        Ok(Self(points))
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> PointSeriesView<'_> {
        PointSeriesView::new_unchecked(&self.0)
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for instances built through [`PointSeries::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the points as a slice.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<Point> {
        self.0
    }
}

impl AsRef<[Point]> for PointSeries {
    fn as_ref(&self) -> &[Point] {
        &self.0
    }
}

impl TryFrom<Vec<Point>> for PointSeries {
    type Error = MetricError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

/// Borrowed, validated view into a point series.
#[derive(Debug, Clone, Copy)]
pub struct PointSeriesView<'a>(&'a [Point]);

impl<'a> PointSeriesView<'a> {
    /// Create a new view, validating that the slice is non-empty and finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::EmptySeries`] | `points` is empty |
    /// | [`MetricError::NonFiniteCoordinate`] | Any coordinate is NaN or infinite |
    pub fn new(points: &'a [Point]) -> Result<Self, MetricError> {
        check_points(points)?;
        Ok(Self(points))
    }

    pub(crate) fn new_unchecked(points: &'a [Point]) -> Self {
        Self(points)
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [Point] {
        self.0
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for views built through [`PointSeriesView::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for PointSeriesView<'_> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[Point]> for PointSeriesView<'_> {
    fn as_ref(&self) -> &[Point] {
        self.0
    }
}
