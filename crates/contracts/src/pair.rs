//! MatchedPair - Match Engine output
//!
//! Coincident frame pair data structures and the end-of-run report.

use serde::{Deserialize, Serialize};

use crate::{Frame, PacketIdentity, TimestampBasis};

/// One coincident pair of frames, stream A on the left.
///
/// Timestamps are captured at match time so the record stays meaningful
/// after the frames' basis configuration goes out of scope.
#[derive(Debug, Clone)]
pub struct MatchedPair {
    /// Frame from stream A
    pub a: Frame,

    /// Frame from stream B
    pub b: Frame,

    /// Timestamp of `a` under the run's basis, nanoseconds
    pub a_timestamp_ns: i64,

    /// Timestamp of `b` under the run's basis, nanoseconds
    pub b_timestamp_ns: i64,
}

impl MatchedPair {
    /// Build a pair, capturing both timestamps under `basis`.
    pub fn new(a: Frame, b: Frame, basis: TimestampBasis) -> Self {
        let a_timestamp_ns = a.timestamp_ns(basis);
        let b_timestamp_ns = b.timestamp_ns(basis);
        Self {
            a,
            b,
            a_timestamp_ns,
            b_timestamp_ns,
        }
    }

    /// Identity key: the per-stream indices of both constituents.
    ///
    /// Pair equality is defined over this key, not over timestamps, so a
    /// re-read of identical frames is a distinct (and flaggable) observation.
    pub fn key(&self) -> (u64, u64) {
        (self.a.index, self.b.index)
    }

    /// Observation identity: which captured packets the pair was built from.
    ///
    /// Two pairs with equal observation keys saw the same physical packets
    /// twice — a decoder or windowing defect, flagged by the collector.
    pub fn observation_key(&self) -> (PacketIdentity, PacketIdentity) {
        (self.a.meta.packet_identity(), self.b.meta.packet_identity())
    }

    /// Signed timestamp difference `a - b` in nanoseconds.
    pub fn diff_ns(&self) -> i64 {
        self.a_timestamp_ns - self.b_timestamp_ns
    }

    /// Serializable output row for this pair.
    pub fn record(&self) -> PairRecord {
        PairRecord {
            a_index: self.a.index,
            b_index: self.b.index,
            a_timestamp_ns: self.a_timestamp_ns,
            b_timestamp_ns: self.b_timestamp_ns,
            diff_ns: self.diff_ns(),
        }
    }
}

/// Serializable output row: one matched pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    /// Stream-A frame index
    pub a_index: u64,

    /// Stream-B frame index
    pub b_index: u64,

    /// Stream-A timestamp, nanoseconds
    pub a_timestamp_ns: i64,

    /// Stream-B timestamp, nanoseconds
    pub b_timestamp_ns: i64,

    /// Signed difference `a - b`, nanoseconds
    pub diff_ns: i64,
}

/// End-of-run diagnostics from a matching run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MatchReport {
    /// Total pairs emitted (duplicates included)
    pub pairs: u64,

    /// Exact duplicate pairs flagged by the collector
    pub duplicate_pairs: u64,

    /// Frames pulled from stream A
    pub frames_read_a: u64,

    /// Frames pulled from stream B
    pub frames_read_b: u64,

    /// Stream-B frames evicted from the window buffer
    pub evicted_b: u64,

    /// Largest window buffer depth observed
    pub peak_window_depth: usize,

    /// Timestamp regressions observed in stream A
    pub ordering_violations_a: u64,

    /// Timestamp regressions observed in stream B
    pub ordering_violations_b: u64,
}

impl MatchReport {
    /// Total ordering violations across both streams.
    pub fn ordering_violations(&self) -> u64 {
        self.ordering_violations_a + self.ordering_violations_b
    }
}
