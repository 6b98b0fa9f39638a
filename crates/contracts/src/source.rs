//! FrameSource trait - Frame data source abstraction
//!
//! Defines a unified interface for frame sources, decoupling the matcher
//! from concrete inputs. Supports unified handling of on-disk frame files
//! and in-memory synthetic sources.

use crate::{CoreError, Frame, StreamLabel};

/// Frame data source trait
///
/// Abstracts the common behavior of file-backed cursors and in-memory test
/// sources. The matcher only ever sees this interface.
///
/// # Contract
///
/// 1. **One record per call**: `pull()` consumes exactly one record from the
///    underlying source — no speculative read-ahead, so test harnesses see
///    deterministic consumption.
/// 2. **Structured EOF**: a clean end-of-stream is `Ok(None)`, never an
///    error; corruption is a [`CoreError::Decode`].
/// 3. **Index assignment**: implementations hand out indices 0, 1, 2, … in
///    pull order.
///
/// # Example
///
/// ```ignore
/// let mut source: FrameCursor<File> = open_stream(path)?;
/// while let Some(frame) = source.pull()? {
///     println!("frame {} at {}", frame.index, frame.timestamp_ns(basis));
/// }
/// ```
pub trait FrameSource {
    /// Which stream this source feeds
    fn stream(&self) -> StreamLabel;

    /// Pull the next frame, or `None` at clean end-of-stream.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] on mid-stream corruption; the source is
    /// poisoned afterwards and must not be pulled again.
    fn pull(&mut self) -> Result<Option<Frame>, CoreError>;

    /// Timestamp regressions observed so far (advisory diagnostic).
    ///
    /// Sources that cannot observe ordering report zero.
    fn ordering_violations(&self) -> u64 {
        0
    }
}
