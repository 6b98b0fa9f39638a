//! LogSink - logs each matched pair via tracing

use contracts::{CoreError, PairRecord, PairSink};
use tracing::info;

/// Sink that logs matched pairs for interactive runs and debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PairSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, record: &PairRecord) -> Result<(), CoreError> {
        info!(
            sink = %self.name,
            a_index = record.a_index,
            b_index = record.b_index,
            a_timestamp_ns = record.a_timestamp_ns,
            b_timestamp_ns = record.b_timestamp_ns,
            diff_ns = record.diff_ns,
            "coincident pair"
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CoreError> {
        // Nothing buffered for log sink
        Ok(())
    }

    fn close(&mut self) -> Result<(), CoreError> {
        Ok(())
    }
}
