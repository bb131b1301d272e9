//! DTW alignment cost between two point sequences.

use tracing::instrument;

use crate::distance::DtwDistance;
use crate::error::MetricError;
use crate::kernel::distance;
use crate::path::{WarpingPath, WarpingStep};
use crate::series::{Point, PointSeriesView};

/// Immutable DTW configuration. Thread-safe and copyable.
///
/// The step cost is the Euclidean distance between paired points divided by
/// `scale`. The result is the raw cumulative cost: no normalization by path
/// length is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dtw {
    scale: f64,
}

impl Default for Dtw {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Dtw {
    /// Create a DTW calculator with unit distance scale.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a DTW calculator dividing every step cost by `scale`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::InvalidScale`] if `scale` is NaN, infinite, or not positive.
    pub fn with_scale(scale: f64) -> Result<Self, MetricError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(MetricError::InvalidScale { scale });
        }
        Ok(Self { scale })
    }

    /// Return the distance scale factor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Compute the DTW cost between two point sequences.
    ///
    /// Evaluates the `(n+1) x (m+1)` recurrence with a rolling two-row buffer:
    /// row 0 and column 0 are +inf except cell `(0, 0) = 0`, and
    /// `C[i][j] = d(sys[i-1], ref[j-1]) + min(C[i-1][j], C[i][j-1], C[i-1][j-1])`.
    /// Runs in O(n * m) time and O(m) space.
    #[must_use]
    #[instrument(level = "trace", skip_all, fields(sys_len = sys.len(), ref_len = reference.len()))]
    pub fn distance(&self, sys: PointSeriesView<'_>, reference: PointSeriesView<'_>) -> DtwDistance {
        DtwDistance::new(self.dtw_rolling(sys.as_slice(), reference.as_slice()))
    }

    /// Compute the DTW cost and an optimal warping path.
    ///
    /// Allocates the full cost matrix plus a direction array for traceback.
    /// Use [`distance`][Dtw::distance] when only the scalar cost is needed.
    #[must_use]
    #[instrument(level = "trace", skip_all, fields(sys_len = sys.len(), ref_len = reference.len()))]
    pub fn distance_and_path(
        &self,
        sys: PointSeriesView<'_>,
        reference: PointSeriesView<'_>,
    ) -> (DtwDistance, WarpingPath) {
        let (dist, steps) = self.dtw_full(sys.as_slice(), reference.as_slice());
        (DtwDistance::new(dist), WarpingPath::new(steps))
    }

    fn dtw_rolling(&self, a: &[Point], b: &[Point]) -> f64 {
        let m = b.len();
        let mut prev = vec![f64::INFINITY; m + 1];
        let mut curr = vec![f64::INFINITY; m + 1];
        prev[0] = 0.0;

        for &p in a {
            curr[0] = f64::INFINITY;
            for j in 1..=m {
                let cost = distance(p, b[j - 1], self.scale);
                curr[j] = cost + prev[j].min(curr[j - 1]).min(prev[j - 1]);
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds row n.
        prev[m]
    }

    /// Full-matrix DTW with traceback.
    ///
    /// Cell `(i, j)` of the padded matrix lives at `i * (m + 1) + j`.
    /// Direction bytes: 0 = diagonal, 1 = above, 2 = left. Ties prefer the
    /// diagonal, then above.
    fn dtw_full(&self, a: &[Point], b: &[Point]) -> (f64, Vec<WarpingStep>) {
        let n = a.len();
        let m = b.len();
        let width = m + 1;

        let mut cost = vec![f64::INFINITY; (n + 1) * width];
        let mut dirs = vec![0u8; (n + 1) * width];
        cost[0] = 0.0;

        for i in 1..=n {
            for j in 1..=m {
                let c = distance(a[i - 1], b[j - 1], self.scale);
                let diag = cost[(i - 1) * width + j - 1];
                let above = cost[(i - 1) * width + j];
                let left = cost[i * width + j - 1];

                let (min_val, dir) = if diag <= above && diag <= left {
                    (diag, 0u8)
                } else if above <= left {
                    (above, 1u8)
                } else {
                    (left, 2u8)
                };

                cost[i * width + j] = c + min_val;
                dirs[i * width + j] = dir;
            }
        }

        let mut path = Vec::with_capacity(n + m);
        let (mut i, mut j) = (n, m);
        loop {
            path.push(WarpingStep {
                sys: i - 1,
                reference: j - 1,
            });
            if i == 1 && j == 1 {
                break;
            }
            match dirs[i * width + j] {
                0 => {
                    i -= 1;
                    j -= 1;
                }
                1 => i -= 1,
                2 => j -= 1,
                _ => unreachable!("invalid direction byte"),
            }
        }
        path.reverse();

        (cost[n * width + m], path)
    }
}
