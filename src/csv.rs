use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::game::Report;
use crate::model::describe;
use crate::tin::{ParseTinError, Tin};

/// Errors that can occur when reading tins or writing reports
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: invalid tin: {source}")]
    InvalidTin { line: usize, source: ParseTinError },

    #[error("failed to write report: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush output: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct InputRow {
    tin: String,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    tin: String,
    greens: usize,
    expected: String,
    last: String,
    steps: usize,
    after: String,
}

impl From<&Report> for OutputRow {
    fn from(report: &Report) -> Self {
        Self {
            tin: report.before.to_string(),
            greens: report.greens,
            expected: describe(report.expected),
            last: describe(report.outcome.last),
            steps: report.outcome.steps,
            after: report.after.to_string(),
        }
    }
}

/// Read tins from a csv file with a single `tin` column
pub fn read_tins(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Tin, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            row.tin
                .parse::<Tin>()
                .map_err(|source| CsvError::InvalidTin { line, source })
        }))
}

/// Write game reports in csv format
pub fn write_reports<'a>(
    writer: impl io::Write,
    reports: impl IntoIterator<Item = &'a Report>,
) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for report in reports {
        writer.serialize(OutputRow::from(report))?;
    }

    writer.flush()?;
    Ok(())
}
