//! Writing result sets to stdout or a file

use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use super::CliError;
use crate::output::{render_table, CsvRowWriter, JsonRowWriter, OutputError, OutputResult, RowWriter};
use crate::query::{QueryResultSet, DEFAULT_BATCH_SIZE};
use crate::TabularRow;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table
    #[default]
    Human,
    /// JSON array of objects
    Json,
    /// CSV with a header row
    Csv,
}

/// Where and how results are written
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output format
    pub format: OutputFormat,
    /// Target file; stdout when absent
    pub path: Option<PathBuf>,
}

/// Write a result set, draining it in batches
pub fn emit<R: TabularRow>(
    mut results: QueryResultSet<R>,
    options: &OutputOptions,
) -> Result<(), CliError> {
    let path = options.path.as_deref();

    let written = match (options.format, path) {
        (OutputFormat::Human, None) => {
            print!("{}", render_table(results.rows()));
            results.len() as u64
        }
        (OutputFormat::Human, Some(path)) => {
            std::fs::write(path, render_table(results.rows()))
                .map_err(|e| OutputError::IoError(format!("Failed to write {}: {e}", path.display())))?;
            results.len() as u64
        }
        (OutputFormat::Csv, Some(path)) => drain(CsvRowWriter::<R>::create(path)?, &mut results)?,
        (OutputFormat::Csv, None) => drain(
            CsvRowWriter::<R, _>::from_writer(io::stdout().lock())?,
            &mut results,
        )?,
        (OutputFormat::Json, Some(path)) => drain(JsonRowWriter::<R>::create(path)?, &mut results)?,
        (OutputFormat::Json, None) => drain(
            JsonRowWriter::<R, _>::from_writer(io::stdout().lock())?,
            &mut results,
        )?,
    };

    if let Some(path) = path {
        report_file(path, written);
    }
    Ok(())
}

fn drain<R: TabularRow, W: RowWriter<R>>(
    mut writer: W,
    results: &mut QueryResultSet<R>,
) -> OutputResult<u64> {
    while let Some(batch) = results.next_batch(DEFAULT_BATCH_SIZE) {
        writer.write_rows(batch)?;
    }
    let written = writer.rows_written();
    writer.close()?;
    Ok(written)
}

fn report_file(path: &Path, rows: u64) {
    info!(rows, path = %path.display(), "Results written");
    eprintln!("Wrote {rows} rows to {}", path.display());
}
