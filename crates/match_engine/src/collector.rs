//! Pair collector: accumulation, duplicate detection, canonical ordering.

use std::collections::HashSet;

use contracts::{MatchedPair, PacketIdentity, PairRecord};
use tracing::warn;

/// Accumulates matched pairs in emission order.
///
/// A pair whose constituent packets were both seen in an earlier pair is an
/// exact duplicate — the same physical observation recorded twice, which
/// indicates a decoder or windowing defect (or duplicated input content).
/// Duplicates are flagged and counted, never silently dropped: the caller
/// decides what to do with them.
#[derive(Debug, Default)]
pub struct PairCollector {
    pairs: Vec<MatchedPair>,
    seen: HashSet<(PacketIdentity, PacketIdentity)>,
    duplicates: u64,
}

impl PairCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one emitted pair, flagging exact duplicates.
    pub fn push(&mut self, pair: MatchedPair) {
        if !self.seen.insert(pair.observation_key()) {
            self.duplicates += 1;
            warn!(
                a_index = pair.a.index,
                b_index = pair.b.index,
                a_timestamp_ns = pair.a_timestamp_ns,
                b_timestamp_ns = pair.b_timestamp_ns,
                "duplicate frame pair"
            );
            metrics::counter!("coincidence_duplicate_pairs_total").increment(1);
        }
        self.pairs.push(pair);
    }

    /// Pairs recorded so far.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Exact duplicates flagged so far.
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    /// Stable sort into the canonical order (stream-A index, stream-B index).
    pub fn sort_canonical(&mut self) {
        self.pairs.sort_by_key(MatchedPair::key);
    }

    /// Serializable records, in current order.
    pub fn records(&self) -> Vec<PairRecord> {
        self.pairs.iter().map(MatchedPair::record).collect()
    }

    /// Consume the collector, yielding pairs in current order.
    pub fn into_pairs(self) -> Vec<MatchedPair> {
        self.pairs
    }
}
