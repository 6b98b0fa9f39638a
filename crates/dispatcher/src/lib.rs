//! # Dispatcher
//!
//! 结果分发模块。
//!
//! 负责：
//! - 消费 `PairRecord`
//! - Fan-out 到多个 sinks（日志 / CSV / JSON）
//! - 按配置构建 sinks

pub mod dispatcher;
pub mod sinks;

pub use contracts::{PairRecord, PairSink};
pub use dispatcher::PairDispatcher;
pub use sinks::{build_sink, CsvSink, JsonSink, LogSink};
