//! CSV output writer

use csv::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult, OutputWriter, RowWriter};
use crate::TabularRow;

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// CSV writer for any [`TabularRow`]
///
/// The header is written on creation, so an empty result still produces a
/// file with column names.
pub struct CsvRowWriter<R, W: Write = BufWriter<File>> {
    writer: Writer<W>,
    rows_written: u64,
    _row: PhantomData<fn(&R)>,
}

impl<R: TabularRow> CsvRowWriter<R> {
    /// Create a writer for a new file at `path`
    ///
    /// Parent directories are created when missing.
    pub fn create<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating CSV writer: path={}", path.display());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {e}")))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {e}")))?;

        Self::from_writer(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
    }
}

impl<R: TabularRow, W: Write> CsvRowWriter<R, W> {
    /// Create a writer over any byte sink
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut writer = Writer::from_writer(inner);
        writer
            .write_record(R::COLUMNS)
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            rows_written: 0,
            _row: PhantomData,
        })
    }

    /// Finish writing and return the underlying sink
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {e}")))
    }
}

impl<R: TabularRow, W: Write> RowWriter<R> for CsvRowWriter<R, W> {
    fn write_row(&mut self, row: &R) -> OutputResult<()> {
        let record: Vec<String> = row.values().iter().map(ToString::to_string).collect();

        self.writer
            .write_record(&record)
            .map_err(|e| OutputError::CsvError(format!("Failed to write row: {e}")))?;

        self.rows_written += 1;

        if self.rows_written % 1000 == 0 {
            self.flush()?;
            debug!("Progress: {} rows written", self.rows_written);
        }

        Ok(())
    }

    fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl<R: TabularRow, W: Write> OutputWriter for CsvRowWriter<R, W> {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {e}")))
    }

    fn close(mut self) -> OutputResult<()> {
        debug!("Closing CSV writer: {} total rows written", self.rows_written);
        self.flush()?;
        info!("CSV writer closed successfully: {} rows written", self.rows_written);
        Ok(())
    }
}
