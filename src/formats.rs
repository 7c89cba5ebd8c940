//! Output formats: a JSON array of records or a flat CSV table.
//! Both writers create or truncate the target file.

use crate::model::BranchRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Separator used inside a CSV cell for `latlon` and `phones`.
pub const CSV_LIST_SEPARATOR: &str = ", ";

const CSV_HEADER: [&str; 5] = ["address", "latlon", "name", "phones", "working_hours"];

/// Output format selector for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    /// Fixed output file name for this format.
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Json => "task1.json",
            OutputFormat::Csv => "task1.csv",
        }
    }
}

/// Errors from the JSON and CSV writers.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to create output file: {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

fn create(path: &Path) -> Result<File, FormatError> {
    File::create(path).map_err(|e| FormatError::CreateFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write records as a pretty-printed JSON array; `latlon` and `phones` stay native arrays.
pub fn write_json(records: &[BranchRecord], path: &Path) -> Result<(), FormatError> {
    let mut w = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut w, records)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

/// Write records as CSV with a header row. List fields are joined into a single cell.
pub fn write_csv(records: &[BranchRecord], path: &Path) -> Result<(), FormatError> {
    let mut w = csv::Writer::from_writer(create(path)?);
    w.write_record(CSV_HEADER)?;
    for r in records {
        let latlon = r
            .latlon
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(CSV_LIST_SEPARATOR);
        let phones = r.phones.join(CSV_LIST_SEPARATOR);
        w.write_record([
            r.address.as_str(),
            latlon.as_str(),
            r.name.as_str(),
            phones.as_str(),
            r.working_hours.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Dispatch to the writer for `format`.
pub fn write_records(
    records: &[BranchRecord],
    format: OutputFormat,
    path: &Path,
) -> Result<(), FormatError> {
    match format {
        OutputFormat::Json => write_json(records, path),
        OutputFormat::Csv => write_csv(records, path),
    }
}
