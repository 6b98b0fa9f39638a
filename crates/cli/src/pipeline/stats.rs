//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::MatchMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total coincident pairs found
    pub pairs_found: u64,

    /// Frames read from stream A
    pub frames_read_a: u64,

    /// Frames read from stream B
    pub frames_read_b: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Number of sinks that received records
    pub active_sinks: usize,

    /// Match metrics aggregator
    pub match_metrics: MatchMetricsAggregator,
}

impl PipelineStats {
    /// Stream-A frames processed per second
    pub fn frames_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_read_a as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        let summary = self.match_metrics.summary();

        println!("\n=== Coincidence Run Summary ===\n");
        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Pairs found: {}", self.pairs_found);
        println!(
            "   ├─ Frames read: A={}, B={}",
            self.frames_read_a, self.frames_read_b
        );
        println!("   ├─ A-frames/s: {:.0}", self.frames_per_sec());
        println!("   └─ Active sinks: {}", self.active_sinks);

        println!("\nMatch Diagnostics");
        println!("   ├─ Duplicate pairs: {}", summary.duplicate_pairs);
        println!("   ├─ Ordering violations: {}", summary.ordering_violations);
        println!(
            "   ├─ Window: peak depth {}, evicted {}",
            summary.peak_window_depth, summary.evicted_b
        );
        println!("   └─ |diff| (ns): {}", summary.abs_diff_ns);

        println!();
    }
}
