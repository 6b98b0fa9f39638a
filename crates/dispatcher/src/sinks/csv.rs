//! CsvSink - writes pair records as CSV rows
//!
//! One row per pair, with human-readable UTC columns alongside the raw
//! nanosecond values for spreadsheet consumers.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use contracts::{CoreError, PairRecord, PairSink};
use tracing::debug;

use super::require_path;

const HEADER: &str = "a_index,b_index,a_timestamp_ns,b_timestamp_ns,diff_ns,a_utc,b_utc";

/// Sink that appends pair records to a CSV file
pub struct CsvSink {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    rows: u64,
}

impl CsvSink {
    /// Create the output file and write the header row
    pub fn new(name: impl Into<String>, path: PathBuf) -> Result<Self, CoreError> {
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{HEADER}")?;
        Ok(Self {
            name: name.into(),
            path,
            writer,
            rows: 0,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let path = require_path(&name, params)?;
        Self::new(name, path)
    }

    fn utc_string(ts_ns: i64) -> String {
        DateTime::<Utc>::from_timestamp_nanos(ts_ns).to_rfc3339()
    }
}

impl PairSink for CsvSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, record: &PairRecord) -> Result<(), CoreError> {
        writeln!(
            self.writer,
            "{},{},{},{},{},{},{}",
            record.a_index,
            record.b_index,
            record.a_timestamp_ns,
            record.b_timestamp_ns,
            record.diff_ns,
            Self::utc_string(record.a_timestamp_ns),
            Self::utc_string(record.b_timestamp_ns),
        )
        .map_err(|e| CoreError::sink_write(&self.name, e.to_string()))?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CoreError> {
        self.writer
            .flush()
            .map_err(|e| CoreError::sink_write(&self.name, e.to_string()))
    }

    fn close(&mut self) -> Result<(), CoreError> {
        self.flush()?;
        debug!(sink = %self.name, path = %self.path.display(), rows = self.rows, "CSV sink closed");
        Ok(())
    }
}
