//! # Match Engine
//!
//! 双流符合检测引擎（单趟、有界内存）。
//!
//! 负责：
//! - 驱动流 A、缓冲流 B 的流式时间连接
//! - 窗口缓冲的左端淘汰与右端补帧
//! - 重复配对检测与结果收集
//!
//! ## 使用示例
//!
//! ```ignore
//! use contracts::MatcherConfig;
//! use match_engine::CoincidenceMatcher;
//!
//! let matcher = CoincidenceMatcher::new(MatcherConfig::default(), cursor_a, cursor_b);
//! let outcome = matcher.run()?;
//!
//! for record in outcome.records() {
//!     // (a_index, b_index, a_timestamp_ns, b_timestamp_ns, diff_ns)
//! }
//! println!("{} pairs, {} duplicates", outcome.report.pairs, outcome.report.duplicate_pairs);
//! ```

mod buffer;
mod collector;
mod engine;

pub use buffer::WindowBuffer;
pub use collector::PairCollector;
pub use engine::{CoincidenceMatcher, MatchOutcome};

// Re-export contracts types
pub use contracts::{MatchReport, MatchedPair, MatcherConfig, PairRecord, TimestampBasis};
