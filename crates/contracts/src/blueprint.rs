//! RunBlueprint - Config Loader 输出
//!
//! 描述一次完整的符合检测运行：输入流、匹配容差、载荷几何、输出路由。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use validator::Validate;

use crate::{MatcherConfig, PayloadGeometry, TimestampBasis};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete blueprint for one matching run.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// The two input streams
    pub streams: StreamsConfig,

    /// Matching tolerance and timestamp basis
    #[serde(rename = "match", default)]
    pub matching: MatchSettings,

    /// Pixel payload geometry
    #[serde(default)]
    #[validate(nested)]
    pub payload: PayloadGeometry,

    /// 输出路由配置
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

/// The pair of input streams for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamsConfig {
    /// Driving stream (pulled to completion)
    pub a: StreamConfig,

    /// Buffered stream (window-buffered candidate set)
    pub b: StreamConfig,
}

/// One input stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Path to the frame file
    pub path: PathBuf,
}

/// Matching tolerance settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Maximum timestamp difference in nanoseconds (inclusive)
    #[serde(default = "default_max_time_diff_ns")]
    pub max_time_diff_ns: u64,

    /// Which per-frame timestamp to match on
    #[serde(default)]
    pub timestamp_basis: TimestampBasis,
}

fn default_max_time_diff_ns() -> u64 {
    100
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            max_time_diff_ns: default_max_time_diff_ns(),
            timestamp_basis: TimestampBasis::default(),
        }
    }
}

/// Sink 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink 名称
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// 日志输出
    Log,
    /// CSV 文件输出
    Csv,
    /// JSON 文件输出
    Json,
}

impl RunBlueprint {
    /// Build a MatcherConfig from the blueprint's match settings.
    pub fn to_matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            max_time_diff_ns: self.matching.max_time_diff_ns,
            basis: self.matching.timestamp_basis,
        }
    }
}
