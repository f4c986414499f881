//! Tabular export of a run history.
//!
//! One row per completed episode, with the run settings repeated on every
//! row so each file stands alone:
//!
//! ```text
//! algorithm,episodes,alpha,gamma,epsilon,episode,reward,steps,reached
//! qlearning,500,0.1,0.99,0.1,1,-21.3000,200,0
//! ```

use std::io::{Read, Write};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use csv::StringRecord;
use tracing::{debug, warn};

use super::error::TrainingError;
use super::metrics::{EpisodeRecord, RunHistory};
use crate::agents::{AgentParams, Algorithm};

pub const CSV_HEADER: &str = "algorithm,episodes,alpha,gamma,epsilon,episode,reward,steps,reached";

const COLUMNS: usize = 9;

/// Writes `history` as CSV and returns the number of data rows written.
///
/// An empty history is reported as [`TrainingError::NoRunData`] and nothing
/// is written.
pub fn export_csv<W: Write>(history: &RunHistory, mut writer: W) -> Result<usize, TrainingError> {
    if history.is_empty() {
        warn!(run = %history.id, "Export requested for a run with no completed episodes");
        return Err(TrainingError::NoRunData);
    }

    writeln!(writer, "{CSV_HEADER}")?;
    let p = history.params;
    for r in history.records() {
        writeln!(
            writer,
            "{},{},{},{},{},{},{:.4},{},{}",
            history.algorithm.name(),
            history.episodes,
            p.alpha,
            p.gamma,
            p.epsilon,
            r.episode,
            r.reward,
            r.steps,
            u8::from(r.reached)
        )?;
    }
    writer.flush()?;
    debug!(run = %history.id, rows = history.len(), "Run exported");
    Ok(history.len())
}

/// Default file name for an exported run: `run-<algorithm>-<unix-millis>.csv`.
pub fn export_file_name(history: &RunHistory) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("run-{}-{}.csv", history.algorithm.name(), millis)
}

/// Parses a table written by [`export_csv`].
///
/// Run settings are taken from the first data row. Blank lines are skipped.
/// The reward column is rounded to 4 decimals on export, so a re-read
/// history matches the exported one only to that precision.
pub fn read_csv<R: Read>(reader: R) -> Result<RunHistory, TrainingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?;
    if headers.is_empty() {
        return Err(TrainingError::NoRunData);
    }
    if headers.iter().collect::<Vec<_>>().join(",") != CSV_HEADER {
        return Err(malformed(1, "unexpected header"));
    }

    let mut history: Option<RunHistory> = None;
    for result in rdr.records() {
        let record = result?;
        let line_no = record.position().map_or(0, |p| p.line() as usize);
        let row = parse_row(&record, line_no)?;
        let h = history.get_or_insert_with(|| RunHistory::new(row.algorithm, row.episodes, row.params));
        h.push(row.record);
    }

    history.ok_or(TrainingError::NoRunData)
}

struct Row {
    algorithm: Algorithm,
    episodes: usize,
    params: AgentParams,
    record: EpisodeRecord,
}

fn parse_row(fields: &StringRecord, line_no: usize) -> Result<Row, TrainingError> {
    if fields.len() != COLUMNS {
        return Err(malformed(
            line_no,
            format!("expected {COLUMNS} columns, found {}", fields.len()),
        ));
    }

    let algorithm = fields[0]
        .parse::<Algorithm>()
        .map_err(|e| malformed(line_no, e.to_string()))?;
    let reached = match &fields[8] {
        "1" | "true" => true,
        "0" | "false" => false,
        other => return Err(malformed(line_no, format!("invalid reached flag {other:?}"))),
    };

    Ok(Row {
        algorithm,
        episodes: field(fields, 1, "episodes", line_no)?,
        params: AgentParams {
            alpha: field(fields, 2, "alpha", line_no)?,
            gamma: field(fields, 3, "gamma", line_no)?,
            epsilon: field(fields, 4, "epsilon", line_no)?,
        },
        record: EpisodeRecord {
            episode: field(fields, 5, "episode", line_no)?,
            reward: field(fields, 6, "reward", line_no)?,
            steps: field(fields, 7, "steps", line_no)?,
            reached,
        },
    })
}

fn field<T: FromStr>(fields: &StringRecord, idx: usize, name: &str, line_no: usize) -> Result<T, TrainingError> {
    fields[idx]
        .parse()
        .map_err(|_| malformed(line_no, format!("invalid {name} {:?}", &fields[idx])))
}

fn malformed(line: usize, reason: impl Into<String>) -> TrainingError {
    TrainingError::MalformedRow {
        line,
        reason: reason.into(),
    }
}
