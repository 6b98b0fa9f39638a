//! Matcher configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

/// Which per-frame timestamp is used for coincidence matching.
///
/// Both bases combine a seconds field with the GPS nanosecond counter; the
/// choice is always explicit, never inferred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampBasis {
    /// `tv_sec * 1e9 + pkt_nsec` (host receive second + GPS nanosecond)
    #[default]
    Receive,
    /// `pkt_utc * 1e9 + pkt_nsec` (pure GPS clock)
    PacketUtc,
}

/// Coincidence matcher configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Maximum allowed timestamp difference in nanoseconds (inclusive)
    pub max_time_diff_ns: u64,

    /// Timestamp basis used for the comparison
    #[serde(default)]
    pub basis: TimestampBasis,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_time_diff_ns: 100,
            basis: TimestampBasis::default(),
        }
    }
}

impl MatcherConfig {
    /// Whether two timestamps fall within tolerance of each other.
    pub fn coincident(&self, a_ts: i64, b_ts: i64) -> bool {
        a_ts.abs_diff(b_ts) <= self.max_time_diff_ns
    }
}
