//! PairSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{CoreError, PairRecord};

/// Pair output trait
///
/// All sink implementations must implement this trait. Sinks are driven
/// synchronously, in emission order, by the dispatcher.
pub trait PairSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one matched-pair record
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, record: &PairRecord) -> Result<(), CoreError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), CoreError>;

    /// Close sink
    fn close(&mut self) -> Result<(), CoreError>;
}
