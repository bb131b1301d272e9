//! GEO-BLEU and DTW similarity between 2-D point sequences.
//!
//! Pure math library with zero I/O. Provides the exponential proximity
//! kernel, n-gram generation with greedy one-to-one matching, the GEO-BLEU
//! score, and DTW alignment cost with optional warping path extraction.

mod distance;
mod dtw;
mod error;
mod geobleu;
mod kernel;
mod ngram;
mod path;
mod series;

pub use distance::{DtwDistance, GeoBleuScore};
pub use dtw::Dtw;
pub use error::MetricError;
pub use geobleu::{
    DEFAULT_BETA, DEFAULT_MAX_N, GeoBleu, GeoBleuBreakdown, brevity_penalty, geometric_mean,
};
pub use kernel::{distance, ngram_proximity, point_proximity};
pub use ngram::{Edge, Matching, generate_ngrams, greedy_matching, precision_at_n};
pub use path::{WarpingPath, WarpingStep};
pub use series::{Point, PointSeries, PointSeriesView};
