//! PairDispatcher - fans records out to all configured sinks.

use contracts::{CoreError, PairRecord, PairSink, SinkConfig};
use tracing::{info, instrument, warn};

use crate::sinks::build_sink;

/// Synchronous fan-out over the configured sinks.
///
/// Records are written to every sink in configuration order; the first sink
/// failure aborts the run (results on disk must never be silently partial).
pub struct PairDispatcher {
    sinks: Vec<Box<dyn PairSink>>,
}

impl PairDispatcher {
    /// Wrap already-built sinks.
    pub fn new(sinks: Vec<Box<dyn PairSink>>) -> Self {
        Self { sinks }
    }

    /// Build every sink named in the configuration.
    pub fn from_configs(configs: &[SinkConfig]) -> Result<Self, CoreError> {
        if configs.is_empty() {
            warn!("no sinks configured - matched pairs will only appear in the summary");
        }
        let sinks = configs
            .iter()
            .map(build_sink)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(sinks))
    }

    /// Number of attached sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sinks are attached.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Write one record to every sink.
    #[instrument(name = "dispatch_record", level = "trace", skip(self, record))]
    pub fn dispatch(&mut self, record: &PairRecord) -> Result<(), CoreError> {
        for sink in &mut self.sinks {
            let result = sink.write(record);
            let status = if result.is_ok() { "success" } else { "failure" };
            metrics::counter!(
                "coincidence_pairs_dispatched_total",
                "sink" => sink.name().to_string(),
                "status" => status.to_string()
            )
            .increment(1);
            result?;
        }
        Ok(())
    }

    /// Flush and close all sinks.
    pub fn close(mut self) -> Result<(), CoreError> {
        for sink in &mut self.sinks {
            sink.flush()?;
            sink.close()?;
            info!(sink = sink.name(), "sink closed");
        }
        Ok(())
    }
}
