//! Geometric proximity kernel shared by GEO-BLEU and DTW.
//!
//! None of these functions validate their parameters: a non-positive `beta`
//! flattens or inverts the decay, and `scale` is applied as a plain divisor.

use crate::series::Point;

/// Euclidean distance between two points, divided by `scale`.
#[must_use]
pub fn distance(a: Point, b: Point, scale: f64) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt() / scale
}

/// Exponential proximity `exp(-beta * d)` in `(0, 1]` for `beta > 0`.
#[must_use]
pub fn point_proximity(a: Point, b: Point, beta: f64) -> f64 {
    (-beta * distance(a, b, 1.0)).exp()
}

/// Product of pointwise proximities over two windows of equal length.
///
/// Windows are zipped, so a longer window's tail is ignored; callers build
/// both windows with the same `n`.
#[must_use]
pub fn ngram_proximity(a: &[Point], b: &[Point], beta: f64) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "n-gram windows must have equal length");
    a.iter()
        .zip(b)
        .map(|(&p, &q)| point_proximity(p, q, beta))
        .product()
}
