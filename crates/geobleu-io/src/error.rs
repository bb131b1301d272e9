//! I/O error types for geobleu-io.

use std::path::PathBuf;

use geobleu_eval::EvalError;

/// Errors from reading, checking, and writing trajectory files.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the task id is not one of the known tasks.
    #[error("invalid task id \"{task}\": expected 1, 2, or test")]
    UnknownTask {
        /// The task id supplied.
        task: String,
    },

    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a file holds no data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a row does not have exactly 5 columns.
    #[error("error at line index {line} of {path}: the number of columns must be 5, got {got}")]
    ColumnCount {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based line index, header included.
        line: usize,
        /// Number of columns found.
        got: usize,
    },

    /// Returned when a cell is not a non-negative integer.
    #[error("error at line index {line} of {path}: each column must be numeric, got \"{raw}\"")]
    NonNumeric {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based line index, header included.
        line: usize,
        /// The raw cell value.
        raw: String,
    },

    /// Returned when a day, time, or coordinate lies outside the task's range.
    #[error("error at line index {line} of {path}: {field}={value} is out of range")]
    OutOfRange {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based line index, header included.
        line: usize,
        /// Column name (`d`, `t`, `x`, or `y`).
        field: &'static str,
        /// The offending value.
        value: u64,
    },

    /// Returned when the submitted uids differ from the task's uid range.
    #[error(
        "the set of uids doesn't match that of reference: {} missing, {} extra",
        .missing.len(),
        .extra.len()
    )]
    UidSetMismatch {
        /// Expected uids absent from the submission, ascending.
        missing: Vec<u64>,
        /// Submitted uids outside the task's range, ascending.
        extra: Vec<u64>,
    },

    /// Returned when the reference dataset has no trajectory for a required uid.
    #[error("reference dataset has no trajectory for uid {uid}")]
    MissingReference {
        /// The uid without a reference trajectory.
        uid: u64,
    },

    /// Returned when a submitted trajectory does not align with its reference.
    #[error("error occurring regarding uid {uid}: {source}")]
    Inconsistent {
        /// The uid whose trajectories disagree.
        uid: u64,
        /// The validation failure.
        source: EvalError,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result artifact cannot be serialized.
    #[error("cannot serialize result artifact")]
    Serialize {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
