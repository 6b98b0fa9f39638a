//! Window buffer: the stream-B candidate set.
//!
//! A double-ended queue of owned frames, ordered by arrival (equivalently by
//! timestamp, given the per-stream ordering invariant). The matcher evicts
//! from the left as the reference stream advances and appends on the right
//! when it needs more candidates; elements are never removed anywhere else.
//!
//! Depth stays proportional to tolerance divided by stream B's average
//! inter-frame interval; it grows without bound only when stream B lags far
//! behind stream A in time.

use std::collections::VecDeque;

use contracts::{Frame, TimestampBasis};

/// Sliding window over buffered stream-B frames.
#[derive(Debug)]
pub struct WindowBuffer {
    frames: VecDeque<Frame>,
    basis: TimestampBasis,
    evicted: u64,
    peak_depth: usize,
}

impl WindowBuffer {
    /// Create an empty window evaluating timestamps under `basis`.
    pub fn new(basis: TimestampBasis) -> Self {
        Self {
            frames: VecDeque::new(),
            basis,
            evicted: 0,
            peak_depth: 0,
        }
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the window holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Candidate at position `i` from the front.
    pub fn get(&self, i: usize) -> Option<&Frame> {
        self.frames.get(i)
    }

    /// Timestamp of the front candidate.
    pub fn front_timestamp_ns(&self) -> Option<i64> {
        self.frames.front().map(|f| f.timestamp_ns(self.basis))
    }

    /// Append a newly pulled frame on the right.
    pub fn push_back(&mut self, frame: Frame) {
        self.frames.push_back(frame);
        self.peak_depth = self.peak_depth.max(self.frames.len());
    }

    /// Drop front candidates that can no longer match.
    ///
    /// Pops while the front is before `reference_ts` in time AND beyond
    /// `max_time_diff_ns` of it. Under the ordering invariant such a frame
    /// can never match the current or any future reference frame. Returns
    /// the number evicted.
    pub fn evict_stale(&mut self, reference_ts: i64, max_time_diff_ns: u64) -> usize {
        let mut dropped = 0;
        while let Some(front_ts) = self.front_timestamp_ns() {
            let reference_is_after = reference_ts > front_ts;
            if reference_is_after && reference_ts.abs_diff(front_ts) > max_time_diff_ns {
                self.frames.pop_front();
                dropped += 1;
            } else {
                break;
            }
        }
        self.evicted += dropped as u64;
        dropped
    }

    /// Cumulative evictions over the window's lifetime.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Largest depth the window ever reached.
    pub fn peak_depth(&self) -> usize {
        self.peak_depth
    }
}
