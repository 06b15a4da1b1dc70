//! JSON output writer
//!
//! Streams a JSON array of objects, one object per row with keys in column
//! order. Absent cells become `null`.

use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult, OutputWriter, RowWriter};
use crate::TabularRow;

/// Convert a row into a column-ordered JSON object
pub fn row_to_json<R: TabularRow>(row: &R) -> OutputResult<Value> {
    let mut object = Map::with_capacity(R::COLUMNS.len());
    for (column, cell) in R::COLUMNS.iter().zip(row.values()) {
        let value = serde_json::to_value(&cell)
            .map_err(|e| OutputError::SerializationError(e.to_string()))?;
        object.insert((*column).to_string(), value);
    }
    Ok(Value::Object(object))
}

/// JSON array writer for any [`TabularRow`]
pub struct JsonRowWriter<R, W: Write = BufWriter<File>> {
    writer: W,
    rows_written: u64,
    _row: PhantomData<fn(&R)>,
}

impl<R: TabularRow> JsonRowWriter<R> {
    /// Create a writer for a new file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating JSON writer: path={}", path.display());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {e}")))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {e}")))?;
        Self::from_writer(BufWriter::new(file))
    }
}

impl<R: TabularRow, W: Write> JsonRowWriter<R, W> {
    /// Create a writer over any byte sink
    pub fn from_writer(mut writer: W) -> OutputResult<Self> {
        writer
            .write_all(b"[")
            .map_err(|e| OutputError::IoError(e.to_string()))?;
        Ok(Self {
            writer,
            rows_written: 0,
            _row: PhantomData,
        })
    }

    /// Close the array and return the underlying sink
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.finish()?;
        Ok(self.writer)
    }

    fn finish(&mut self) -> OutputResult<()> {
        let tail: &[u8] = if self.rows_written == 0 { b"]\n" } else { b"\n]\n" };
        self.writer
            .write_all(tail)
            .map_err(|e| OutputError::IoError(e.to_string()))?;
        self.flush()
    }
}

impl<R: TabularRow, W: Write> RowWriter<R> for JsonRowWriter<R, W> {
    fn write_row(&mut self, row: &R) -> OutputResult<()> {
        let separator: &[u8] = if self.rows_written == 0 { b"\n  " } else { b",\n  " };
        self.writer
            .write_all(separator)
            .map_err(|e| OutputError::IoError(e.to_string()))?;

        serde_json::to_writer(&mut self.writer, &row_to_json(row)?)
            .map_err(|e| OutputError::SerializationError(format!("Failed to write row: {e}")))?;

        self.rows_written += 1;
        Ok(())
    }

    fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl<R: TabularRow, W: Write> OutputWriter for JsonRowWriter<R, W> {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {e}")))
    }

    fn close(mut self) -> OutputResult<()> {
        self.finish()?;
        debug!("JSON writer closed: {} rows written", self.rows_written);
        Ok(())
    }
}
