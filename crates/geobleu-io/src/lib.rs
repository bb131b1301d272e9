//! Task definitions, trajectory file readers, submission checking, and
//! JSON result output for the geobleu pipeline.

mod check;
mod domain;
mod error;
mod reader;
mod task;
mod writer;

pub use check::{CheckSummary, check_submission};
pub use domain::{ExperimentName, TrajectorySet, Uid};
pub use error::IoError;
pub use reader::{ReferenceReader, SubmissionReader};
pub use task::TaskSpec;
pub use writer::{ResultWriter, ScoreReport};
