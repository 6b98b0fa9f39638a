//! 匹配运行指标收集模块
//!
//! 基于 PairRecord / MatchReport 收集和统计匹配运行的指标。

use contracts::{MatchReport, PairRecord};
use metrics::{counter, gauge, histogram};

/// 记录单个配对的指标
///
/// 每分发一个配对时调用。
pub fn record_pair_metrics(record: &PairRecord) {
    counter!("coincidence_pairs_dispatched").increment(1);
    histogram!("coincidence_pair_abs_diff_ns").record(record.diff_ns.unsigned_abs() as f64);
}

/// 从 MatchReport 记录末端指标
///
/// 匹配运行结束时调用一次。
pub fn record_match_report(report: &MatchReport) {
    gauge!("coincidence_run_pairs").set(report.pairs as f64);
    gauge!("coincidence_run_frames_read", "stream" => "A").set(report.frames_read_a as f64);
    gauge!("coincidence_run_frames_read", "stream" => "B").set(report.frames_read_b as f64);
    gauge!("coincidence_run_peak_window_depth").set(report.peak_window_depth as f64);

    if report.duplicate_pairs > 0 {
        counter!("coincidence_run_duplicate_pairs_total").increment(report.duplicate_pairs);
    }
    if report.ordering_violations() > 0 {
        counter!("coincidence_run_ordering_violations_total")
            .increment(report.ordering_violations());
    }
}

/// 匹配指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct MatchMetricsAggregator {
    /// 总配对数
    pub total_pairs: u64,

    /// 时间差绝对值统计 (纳秒)
    pub abs_diff_stats: RunningStats,

    /// 末端运行报告
    pub report: MatchReport,
}

impl MatchMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新配对统计
    pub fn update(&mut self, record: &PairRecord) {
        self.total_pairs += 1;
        self.abs_diff_stats.push(record.diff_ns.unsigned_abs() as f64);
    }

    /// 记录末端报告
    pub fn finalize(&mut self, report: MatchReport) {
        self.report = report;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_pairs: self.total_pairs,
            duplicate_pairs: self.report.duplicate_pairs,
            frames_read_a: self.report.frames_read_a,
            frames_read_b: self.report.frames_read_b,
            evicted_b: self.report.evicted_b,
            peak_window_depth: self.report.peak_window_depth,
            ordering_violations: self.report.ordering_violations(),
            abs_diff_ns: StatsSummary::from(&self.abs_diff_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_pairs: u64,
    pub duplicate_pairs: u64,
    pub frames_read_a: u64,
    pub frames_read_b: u64,
    pub evicted_b: u64,
    pub peak_window_depth: usize,
    pub ordering_violations: u64,
    pub abs_diff_ns: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Match Metrics Summary ===")?;
        writeln!(f, "Pairs: {}", self.total_pairs)?;
        writeln!(f, "Duplicate pairs: {}", self.duplicate_pairs)?;
        writeln!(
            f,
            "Frames read: A={}, B={}",
            self.frames_read_a, self.frames_read_b
        )?;
        writeln!(
            f,
            "Window: peak depth {}, evicted {}",
            self.peak_window_depth, self.evicted_b
        )?;
        writeln!(f, "Ordering violations: {}", self.ordering_violations)?;
        writeln!(f, "|diff| (ns): {}", self.abs_diff_ns)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}
