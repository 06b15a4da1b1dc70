//! Result set writers
//!
//! Every row type exposes its columns through [`TabularRow`], so one writer
//! per format serves all providers. Absent cells are written as empty CSV
//! fields, JSON `null`, or blank table cells.

use crate::TabularRow;

pub mod csv;
pub mod json;
pub mod table;

pub use self::csv::CsvRowWriter;
pub use self::json::JsonRowWriter;
pub use self::table::render_table;

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    FlushError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Generic output writer trait
pub trait OutputWriter {
    /// Flush any buffered data
    fn flush(&mut self) -> OutputResult<()>;

    /// Close the writer and finalize output
    fn close(self) -> OutputResult<()>;
}

/// Writer for one row type
pub trait RowWriter<R: TabularRow>: OutputWriter {
    /// Write a single row
    fn write_row(&mut self, row: &R) -> OutputResult<()>;

    /// Write multiple rows at once
    fn write_rows(&mut self, rows: &[R]) -> OutputResult<()> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Number of rows written so far
    fn rows_written(&self) -> u64;
}
