//! Sink implementations and the configuration-driven factory.

mod csv;
mod json;
mod log;

pub use csv::CsvSink;
pub use json::JsonSink;
pub use log::LogSink;

use contracts::{CoreError, PairSink, SinkConfig, SinkType};

/// Build one sink from its configuration entry.
pub fn build_sink(config: &SinkConfig) -> Result<Box<dyn PairSink>, CoreError> {
    match config.sink_type {
        SinkType::Log => Ok(Box::new(LogSink::new(&config.name))),
        SinkType::Csv => Ok(Box::new(CsvSink::from_params(&config.name, &config.params)?)),
        SinkType::Json => Ok(Box::new(JsonSink::from_params(&config.name, &config.params)?)),
    }
}

/// Fetch the required `path` parameter for file-backed sinks.
pub(crate) fn require_path(
    sink_name: &str,
    params: &std::collections::HashMap<String, String>,
) -> Result<std::path::PathBuf, CoreError> {
    params
        .get("path")
        .map(std::path::PathBuf::from)
        .ok_or_else(|| {
            CoreError::config_validation(
                format!("sinks[{sink_name}].params.path"),
                "file sinks require a 'path' parameter",
            )
        })
}
