//! CSV readers for submission and reference trajectory files.
//!
//! Both formats are headerless-or-single-header CSV with five integer columns:
//! `uid,d,t,x,y`.

use std::path::{Path, PathBuf};

use csv::StringRecord;
use geobleu_eval::{StepRecord, TimedStep};
use tracing::{debug, info, instrument};

use crate::domain::{TrajectorySet, Uid};
use crate::task::TaskSpec;
use crate::IoError;

const N_COLUMNS: usize = 5;

/// One parsed `uid,d,t,x,y` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    uid: u64,
    day: u64,
    time: u64,
    x: u64,
    y: u64,
}

impl Row {
    fn into_record(self) -> StepRecord {
        StepRecord::Identified {
            uid: self.uid,
            step: TimedStep::new(self.day as u32, self.time as u32, self.x as f64, self.y as f64),
        }
    }
}

/// Streams the records of a CSV file without treating any row as a header.
///
/// `flexible(true)` lets short or long rows through so that the column count
/// check reports [`IoError::ColumnCount`] instead of a low-level parse error.
fn for_each_record(
    path: &Path,
    mut on_record: impl FnMut(usize, &StringRecord) -> Result<(), IoError>,
) -> Result<usize, IoError> {
    let file = std::fs::File::open(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut n_records = 0;
    for (index, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| IoError::CsvParse {
            path: path.to_path_buf(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        // csv skips blank lines, so the physical line is the reliable index.
        let line = record
            .position()
            .map_or(index, |p| p.line().saturating_sub(1) as usize);
        on_record(line, &record)?;
        n_records += 1;
    }
    Ok(n_records)
}

fn is_header(record: &StringRecord) -> bool {
    record.get(0) == Some("uid")
}

/// Parse a 5-column row of non-negative integers.
///
/// With `trim` unset a cell must be ASCII digits and nothing else. With it
/// set, surrounding whitespace is stripped first.
fn parse_row(
    path: &Path,
    line: usize,
    record: &StringRecord,
    trim: bool,
) -> Result<Row, IoError> {
    if record.len() != N_COLUMNS {
        return Err(IoError::ColumnCount {
            path: path.to_path_buf(),
            line,
            got: record.len(),
        });
    }
    let mut values = [0_u64; N_COLUMNS];
    for (slot, raw) in values.iter_mut().zip(record.iter()) {
        let cell = if trim { raw.trim() } else { raw };
        let non_numeric = || IoError::NonNumeric {
            path: path.to_path_buf(),
            line,
            raw: raw.to_string(),
        };
        if cell.is_empty() || !cell.bytes().all(|b| b.is_ascii_digit()) {
            return Err(non_numeric());
        }
        *slot = cell.parse().map_err(|_| non_numeric())?;
    }
    let [uid, day, time, x, y] = values;
    Ok(Row { uid, day, time, x, y })
}

/// Reads a submitted prediction file, checking every cell against a [`TaskSpec`].
///
/// Expected CSV format:
/// - Optional first line starting with `uid,` (skipped)
/// - `uid,d,t,x,y` with every cell made of ASCII digits only, no padding
/// - `d`, `t`, `x`, `y` inside the task's inclusive bounds
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::ColumnCount`] | Row does not have exactly 5 columns |
/// | [`IoError::NonNumeric`] | Cell is not all ASCII digits, whitespace included |
/// | [`IoError::OutOfRange`] | Day, time, or coordinate outside the task bounds |
/// | [`IoError::EmptyDataset`] | No data rows |
pub struct SubmissionReader {
    path: PathBuf,
    task: TaskSpec,
}

impl SubmissionReader {
    /// Create a new reader for the given file and task.
    pub fn new(path: &Path, task: &TaskSpec) -> Self {
        Self {
            path: path.to_path_buf(),
            task: task.clone(),
        }
    }

    /// Read and validate the file, returning one trajectory per uid.
    #[instrument(skip(self), fields(path = %self.path.display(), task = self.task.id))]
    pub fn read(&self) -> Result<TrajectorySet, IoError> {
        let mut set = TrajectorySet::new();
        let mut first = true;
        for_each_record(&self.path, |line, record| {
            let header = first && is_header(record);
            first = false;
            if header {
                debug!("skipping header");
                return Ok(());
            }
            let row = parse_row(&self.path, line, record, false)?;
            self.check_ranges(line, &row)?;
            set.push(Uid::new(row.uid), row.into_record());
            Ok(())
        })?;

        if set.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }
        info!(n_uids = set.len(), n_steps = set.n_steps(), "submission loaded");
        Ok(set)
    }

    fn check_ranges(&self, line: usize, row: &Row) -> Result<(), IoError> {
        let t = &self.task;
        let checks = [
            ("d", row.day, t.d_min, t.d_max),
            ("t", row.time, t.t_min, t.t_max),
            ("x", row.x, t.coord_min, t.coord_max),
            ("y", row.y, t.coord_min, t.coord_max),
        ];
        for (field, value, lo, hi) in checks {
            if !(lo..=hi).contains(&value) {
                return Err(IoError::OutOfRange {
                    path: self.path.clone(),
                    line,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Reads a ground-truth dataset, keeping only the rows a task is scored on.
///
/// Rows whose first cell starts with `uid` are headers and are skipped. Rows
/// with a uid below the task's range are dropped. Steps dated before the
/// task's first predicted day are dropped, but their uid is still registered
/// so that it shows up in [`TrajectorySet::uids`]. Whitespace around a cell
/// is ignored.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::ColumnCount`] | Row does not have exactly 5 columns |
/// | [`IoError::NonNumeric`] | Cell is not all ASCII digits |
/// | [`IoError::OutOfRange`] | Day or time does not fit a 32-bit key |
/// | [`IoError::EmptyDataset`] | No data rows at all |
pub struct ReferenceReader {
    path: PathBuf,
    task: TaskSpec,
}

impl ReferenceReader {
    /// Create a new reader for the given file and task.
    pub fn new(path: &Path, task: &TaskSpec) -> Self {
        Self {
            path: path.to_path_buf(),
            task: task.clone(),
        }
    }

    /// Read the file, returning the task's reference trajectories.
    #[instrument(skip(self), fields(path = %self.path.display(), task = self.task.id))]
    pub fn read(&self) -> Result<TrajectorySet, IoError> {
        let mut set = TrajectorySet::new();
        let mut n_rows = 0_usize;
        for_each_record(&self.path, |line, record| {
            if record.get(0).is_some_and(|c| c.trim_start().starts_with("uid")) {
                return Ok(());
            }
            n_rows += 1;
            let row = parse_row(&self.path, line, record, true)?;
            if row.uid < self.task.uid_range.start {
                return Ok(());
            }
            for (field, value) in [("d", row.day), ("t", row.time)] {
                if u32::try_from(value).is_err() {
                    return Err(IoError::OutOfRange {
                        path: self.path.clone(),
                        line,
                        field,
                        value,
                    });
                }
            }
            let uid = Uid::new(row.uid);
            if row.day >= self.task.d_min {
                set.push(uid, row.into_record());
            } else {
                set.register(uid);
            }
            Ok(())
        })?;

        if n_rows == 0 {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }
        info!(n_uids = set.len(), n_steps = set.n_steps(), "reference loaded");
        Ok(set)
    }
}
