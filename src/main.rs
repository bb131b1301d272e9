use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use geobleu_eval::{Evaluator, StepRecord, TrajectoryScores};
use geobleu_io::{
    ExperimentName, IoError, ReferenceReader, ResultWriter, ScoreReport, SubmissionReader,
    TaskSpec, TrajectorySet, Uid, check_submission,
};
use geobleu_metrics::{DEFAULT_BETA, DEFAULT_MAX_N, Dtw, GeoBleu};

#[derive(Parser)]
#[command(name = "geobleu")]
#[command(about = "GEO-BLEU and DTW scoring for human-mobility trajectory prediction")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Inputs shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Task id: 1, 2, or test
    #[arg(long)]
    task: String,

    /// Path to the ground-truth dataset CSV (uid,d,t,x,y)
    #[arg(long)]
    dataset: PathBuf,

    /// Path to the submitted prediction CSV (uid,d,t,x,y)
    #[arg(long)]
    submission: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a submission is well-formed and aligned with the reference
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate a submission, then score every uid with GEO-BLEU and DTW
    Evaluate {
        #[command(flatten)]
        input: InputArgs,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Largest n-gram order for GEO-BLEU
        #[arg(long, default_value_t = DEFAULT_MAX_N)]
        max_n: usize,

        /// Distance decay for GEO-BLEU proximity, exp(-beta * d)
        #[arg(long, default_value_t = DEFAULT_BETA)]
        beta: f64,

        /// Divisor applied to each DTW step distance
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ValidateOutput {
    task: String,
    valid: bool,
    n_uids: usize,
    n_steps: usize,
}

#[derive(Serialize)]
struct EvaluateOutput {
    experiment: String,
    task: String,
    n_uids: usize,
    max_n: usize,
    beta: f64,
    scale: f64,
    mean_geobleu: Option<f64>,
    mean_dtw: Option<f64>,
    output: PathBuf,
}

/// Load both files and run the whole-submission check.
fn load_checked(input: &InputArgs) -> Result<(TaskSpec, TrajectorySet, TrajectorySet, usize)> {
    let task = TaskSpec::for_task(&input.task)?;

    let reference = ReferenceReader::new(&input.dataset, &task)
        .read()
        .context("failed to read reference dataset")?;
    let submission = SubmissionReader::new(&input.submission, &task)
        .read()
        .context("failed to read submission")?;

    let summary = check_submission(&submission, &reference, &task)
        .context("submission is inconsistent with the reference")?;
    info!(n_uids = summary.n_uids, n_steps = summary.n_steps, "submission validated");

    Ok((task, submission, reference, summary.n_steps))
}

/// Score every submitted uid, fanning out across uids.
fn score_uids(
    submission: &TrajectorySet,
    reference: &TrajectorySet,
    evaluator: &Evaluator,
) -> Result<BTreeMap<Uid, TrajectoryScores>, IoError> {
    let pairs: Vec<(Uid, &[StepRecord])> = submission.iter().collect();
    pairs
        .par_iter()
        .map(|&(uid, predicted)| -> Result<_, IoError> {
            let answer = reference
                .get(uid)
                .ok_or(IoError::MissingReference { uid: uid.get() })?;
            let scores = evaluator
                .evaluate(predicted, answer)
                .map_err(|source| IoError::Inconsistent {
                    uid: uid.get(),
                    source,
                })?;
            Ok((uid, scores))
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Validate { input } => {
            let (task, submission, _, n_steps) = load_checked(&input)?;

            let output = ValidateOutput {
                task: task.id.to_string(),
                valid: true,
                n_uids: submission.len(),
                n_steps,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Evaluate {
            input,
            experiment,
            output_dir,
            max_n,
            beta,
            scale,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let geobleu = GeoBleu::new(max_n, beta).context("invalid GEO-BLEU parameters")?;
            let dtw = Dtw::with_scale(scale).context("invalid DTW parameters")?;
            // Uids are already spread over the pool, so days run sequentially.
            let evaluator = Evaluator::new()
                .with_geobleu(geobleu)
                .with_dtw(dtw)
                .with_parallel(false);

            let (task, submission, reference, _) = load_checked(&input)?;

            let per_uid =
                score_uids(&submission, &reference, &evaluator).context("scoring failed")?;
            let report = ScoreReport::new(task.id, &evaluator, per_uid);
            info!(
                mean_geobleu = report.mean_geobleu,
                mean_dtw = report.mean_dtw,
                "submission scored"
            );

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let path = writer.write_scores(&report)?;

            let output = EvaluateOutput {
                experiment,
                task: report.task.clone(),
                n_uids: report.n_uids,
                max_n: report.max_n,
                beta: report.beta,
                scale: report.scale,
                mean_geobleu: report.mean_geobleu,
                mean_dtw: report.mean_dtw,
                output: path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
