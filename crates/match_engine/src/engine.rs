//! Coincidence matcher: the streaming join driver.
//!
//! One pass over stream A; stream B is buffered in a window whose left edge
//! trails the current A frame by at most the tolerance. Termination is
//! stream A running dry — stream B is never drained past what matching
//! needed.

use contracts::{
    CoreError, Frame, FrameSource, MatchReport, MatchedPair, MatcherConfig,
};
use tracing::{debug, instrument};

use crate::buffer::WindowBuffer;
use crate::collector::PairCollector;

/// Progress line cadence, in stream-A frames.
const PROGRESS_EVERY: u64 = 100_000;

/// Single-pass matcher over two time-ordered frame sources.
pub struct CoincidenceMatcher<A, B> {
    config: MatcherConfig,
    source_a: A,
    source_b: B,
    window: WindowBuffer,
    collector: PairCollector,
    b_exhausted: bool,
    frames_read_a: u64,
    frames_read_b: u64,
}

/// Result of a completed matching run.
#[derive(Debug)]
pub struct MatchOutcome {
    /// Matched pairs in emission order
    pub pairs: Vec<MatchedPair>,

    /// End-of-run diagnostics
    pub report: MatchReport,
}

impl MatchOutcome {
    /// Serializable records in emission order.
    pub fn records(&self) -> Vec<contracts::PairRecord> {
        self.pairs.iter().map(MatchedPair::record).collect()
    }

    /// Serializable records in canonical order (A index, then B index).
    pub fn sorted_records(&self) -> Vec<contracts::PairRecord> {
        let mut records = self.records();
        records.sort_by_key(|r| (r.a_index, r.b_index));
        records
    }
}

impl<A: FrameSource, B: FrameSource> CoincidenceMatcher<A, B> {
    /// Build a matcher over the two sources.
    ///
    /// `source_a` is the driving stream; `source_b` feeds the window buffer.
    pub fn new(config: MatcherConfig, source_a: A, source_b: B) -> Self {
        let window = WindowBuffer::new(config.basis);
        Self {
            config,
            source_a,
            source_b,
            window,
            collector: PairCollector::new(),
            b_exhausted: false,
            frames_read_a: 0,
            frames_read_b: 0,
        }
    }

    /// Run the join to completion.
    ///
    /// # Errors
    /// Propagates the first decode error from either stream; pairs found up
    /// to that point are discarded by this call (callers that want partial
    /// results drive the loop themselves via the source contract).
    #[instrument(name = "coincidence_run", skip(self), fields(max_time_diff_ns = self.config.max_time_diff_ns))]
    pub fn run(mut self) -> Result<MatchOutcome, CoreError> {
        while let Some(a_frame) = self.source_a.pull()? {
            self.frames_read_a += 1;
            self.process_a_frame(&a_frame)?;

            if self.frames_read_a % PROGRESS_EVERY == 0 {
                debug!(
                    frames_a = self.frames_read_a,
                    frames_b = self.frames_read_b,
                    pairs = self.collector.len(),
                    window_depth = self.window.len(),
                    "matching progress"
                );
            }
        }

        debug!(
            frames_a = self.frames_read_a,
            frames_b = self.frames_read_b,
            pairs = self.collector.len(),
            "stream A exhausted, matching complete"
        );

        Ok(self.finish())
    }

    /// One driving-loop iteration: advance the window, then scan it.
    fn process_a_frame(&mut self, a_frame: &Frame) -> Result<(), CoreError> {
        let a_ts = a_frame.timestamp_ns(self.config.basis);
        self.advance_window(a_ts)?;
        self.scan_window(a_frame, a_ts)
    }

    /// Pull one more stream-B frame into the window, `false` once exhausted.
    fn refill(&mut self) -> Result<bool, CoreError> {
        if self.b_exhausted {
            return Ok(false);
        }
        match self.source_b.pull()? {
            Some(frame) => {
                self.frames_read_b += 1;
                self.window.push_back(frame);
                Ok(true)
            }
            None => {
                self.b_exhausted = true;
                Ok(false)
            }
        }
    }

    /// Evict stale candidates relative to the current A timestamp, refilling
    /// whenever eviction empties the window, until the front is either in
    /// reach of coincidence or stream B is exhausted.
    fn advance_window(&mut self, a_ts: i64) -> Result<(), CoreError> {
        loop {
            self.window.evict_stale(a_ts, self.config.max_time_diff_ns);
            if !self.window.is_empty() || !self.refill()? {
                return Ok(());
            }
        }
    }

    /// Emit pairs for every coincident candidate, extending the window on
    /// the right while the scan is still inside tolerance.
    fn scan_window(&mut self, a_frame: &Frame, a_ts: i64) -> Result<(), CoreError> {
        let mut i = 0;
        loop {
            if i == self.window.len() && !self.refill()? {
                break;
            }
            let Some(b_frame) = self.window.get(i) else {
                break;
            };
            let b_ts = b_frame.timestamp_ns(self.config.basis);
            if !self.config.coincident(a_ts, b_ts) {
                // ordering invariant: every later candidate is further away
                break;
            }

            let pair = MatchedPair::new(a_frame.clone(), b_frame.clone(), self.config.basis);
            metrics::counter!("coincidence_pairs_total").increment(1);
            metrics::histogram!("coincidence_pair_diff_ns").record(pair.diff_ns().abs() as f64);
            self.collector.push(pair);
            i += 1;
        }
        Ok(())
    }

    fn finish(self) -> MatchOutcome {
        let report = MatchReport {
            pairs: self.collector.len() as u64,
            duplicate_pairs: self.collector.duplicates(),
            frames_read_a: self.frames_read_a,
            frames_read_b: self.frames_read_b,
            evicted_b: self.window.evicted(),
            peak_window_depth: self.window.peak_depth(),
            ordering_violations_a: self.source_a.ordering_violations(),
            ordering_violations_b: self.source_b.ordering_violations(),
        };
        MatchOutcome {
            pairs: self.collector.into_pairs(),
            report,
        }
    }
}
