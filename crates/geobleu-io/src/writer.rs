//! JSON result writer for evaluation scores.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use geobleu_eval::{Evaluator, TrajectoryScores};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{ExperimentName, Uid};
use crate::IoError;

/// Scores of every uid in a submission, plus the parameters that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    /// Task identifier.
    pub task: String,
    /// Maximum n-gram order used for GEO-BLEU.
    pub max_n: usize,
    /// Distance decay used for GEO-BLEU.
    pub beta: f64,
    /// Distance scale used for DTW.
    pub scale: f64,
    /// Number of uids scored.
    pub n_uids: usize,
    /// Mean GEO-BLEU across uids. `None` when no uid was scored.
    pub mean_geobleu: Option<f64>,
    /// Mean DTW across uids. `None` when no uid was scored.
    pub mean_dtw: Option<f64>,
    /// Per-uid scores in ascending uid order.
    pub per_uid: BTreeMap<Uid, TrajectoryScores>,
}

impl ScoreReport {
    /// Assemble a report, averaging each metric over uids.
    #[must_use]
    pub fn new(
        task: &str,
        evaluator: &Evaluator,
        per_uid: BTreeMap<Uid, TrajectoryScores>,
    ) -> Self {
        let n_uids = per_uid.len();
        let mean = |metric: fn(&TrajectoryScores) -> f64| {
            (n_uids > 0).then(|| per_uid.values().map(metric).sum::<f64>() / n_uids as f64)
        };
        let mean_geobleu = mean(|s| s.geobleu);
        let mean_dtw = mean(|s| s.dtw);
        Self {
            task: task.to_string(),
            max_n: evaluator.geobleu_scorer().max_n(),
            beta: evaluator.geobleu_scorer().beta(),
            scale: evaluator.dtw_scorer().scale(),
            n_uids,
            mean_geobleu,
            mean_dtw,
            per_uid,
        }
    }
}

/// Writes evaluation results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_scores.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write a score report to `{experiment}_scores.json` and return its path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The report cannot be encoded as JSON |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(n_uids = report.n_uids))]
    pub fn write_scores(&self, report: &ScoreReport) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_scores.json", self.experiment.as_str()));

        let artifact = ScoresArtifact {
            experiment: self.experiment.as_str(),
            report,
        };
        let json = serde_json::to_string_pretty(&artifact)?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "scores written");
        Ok(path)
    }
}

#[derive(Serialize)]
struct ScoresArtifact<'a> {
    experiment: &'a str,
    #[serde(flatten)]
    report: &'a ScoreReport,
}
