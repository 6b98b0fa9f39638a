//! JsonSink - writes the full pair list as one JSON document
//!
//! Records are buffered and written at close so the document is always
//! well-formed, even when the run ends early.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Utc;
use contracts::{CoreError, PairRecord, PairSink};
use serde::Serialize;
use tracing::debug;

use super::require_path;

/// Document shape written by [`JsonSink`].
#[derive(Debug, Serialize)]
struct PairDocument<'a> {
    /// RFC 3339 generation time
    generated_at: String,

    /// Number of pairs in `pairs`
    pair_count: usize,

    /// All matched pairs, in dispatch order
    pairs: &'a [PairRecord],
}

/// Sink that collects pair records and writes one JSON document on close
pub struct JsonSink {
    name: String,
    path: PathBuf,
    records: Vec<PairRecord>,
}

impl JsonSink {
    /// Create a JSON sink targeting `path`
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            records: Vec::new(),
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let path = require_path(&name, params)?;
        Ok(Self::new(name, path))
    }
}

impl PairSink for JsonSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, record: &PairRecord) -> Result<(), CoreError> {
        self.records.push(*record);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CoreError> {
        // Buffered until close; nothing to flush incrementally
        Ok(())
    }

    fn close(&mut self) -> Result<(), CoreError> {
        let document = PairDocument {
            generated_at: Utc::now().to_rfc3339(),
            pair_count: self.records.len(),
            pairs: &self.records,
        };

        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &document)
            .map_err(|e| CoreError::sink_write(&self.name, e.to_string()))?;

        debug!(
            sink = %self.name,
            path = %self.path.display(),
            pairs = self.records.len(),
            "JSON sink closed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_contains_all_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.json");

        let mut sink = JsonSink::new("json", path.clone());
        for i in 0..3 {
            sink.write(&PairRecord {
                a_index: i,
                b_index: i,
                a_timestamp_ns: 100 + i as i64,
                b_timestamp_ns: 100 + i as i64,
                diff_ns: 0,
            })
            .unwrap();
        }
        sink.close().unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["pair_count"], 3);
        assert_eq!(parsed["pairs"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["pairs"][2]["a_index"], 2);
        assert!(parsed["generated_at"].is_string());
    }
}
