//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Timestamps are integer nanoseconds since the Unix epoch (`i64`)
//! - Two bases exist per frame: GPS packet time (`pkt_utc`) and host receive
//!   time (`tv_sec`); the matching basis is selected by configuration
//! - `index` is the 0-based pull order within one stream, never shared across streams

mod blueprint;
mod error;
mod frame;
mod match_config;
mod pair;
mod sink;
mod source;
mod stream;

pub use blueprint::*;
pub use error::*;
pub use frame::*;
pub use match_config::*;
pub use pair::*;
pub use sink::PairSink;
pub use source::FrameSource;
pub use stream::StreamLabel;
