//! Error types for trajectory metric configuration and point-series validation.

/// Errors from point-series validation and scorer configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// Returned when an empty slice is provided as a point series.
    #[error("point series must be non-empty")]
    EmptySeries,

    /// Returned when a point has a NaN or infinite coordinate.
    #[error("point series contains non-finite coordinate at index {index}")]
    NonFiniteCoordinate {
        /// Position of the first offending point.
        index: usize,
    },

    /// Returned when GEO-BLEU is configured with `max_n == 0`.
    #[error("max_n must be at least 1, got {max_n}")]
    InvalidMaxN {
        /// The invalid n-gram order.
        max_n: usize,
    },

    /// Returned when the proximity decay rate is non-finite or not positive.
    #[error("beta must be finite and positive, got {beta}")]
    InvalidBeta {
        /// The invalid decay rate.
        beta: f64,
    },

    /// Returned when the DTW distance scale is non-finite or not positive.
    #[error("scale must be finite and positive, got {scale}")]
    InvalidScale {
        /// The invalid scale factor.
        scale: f64,
    },
}
