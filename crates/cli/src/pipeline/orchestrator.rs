//! Pipeline orchestrator - coordinates all components.
//!
//! Opens both frame files, drives the matcher to completion, then feeds the
//! collected records through the dispatcher. Everything is synchronous: the
//! matcher owns the only control flow, and the input files are held for
//! exclusive sequential access until the run finishes.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{
    CoreError, Frame, FrameSource, PayloadGeometry, RunBlueprint, StreamLabel,
};
use dispatcher::PairDispatcher;
use ingestion::{parse_name, FrameCursor};
use match_engine::CoincidenceMatcher;
use observability::{record_match_report, record_pair_metrics, MatchMetricsAggregator};
use tracing::{info, warn};

use super::PipelineStats;

/// Output ordering for dispatched records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputOrder {
    /// Sorted by (stream-A index, stream-B index)
    Canonical,
    /// Matcher emission order
    Emission,
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The run blueprint configuration
    pub blueprint: RunBlueprint,

    /// Maximum number of stream-A frames to process (None = unlimited)
    pub max_a_frames: Option<u64>,

    /// Output ordering
    pub order: OutputOrder,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

/// Caps the number of frames pulled from a source.
///
/// Early termination is just "stop pulling from stream A": wrapping the
/// driving source is all it takes, no teardown logic anywhere else.
struct FrameLimit<S> {
    inner: S,
    remaining: Option<u64>,
}

impl<S: FrameSource> FrameLimit<S> {
    fn new(inner: S, limit: Option<u64>) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<S: FrameSource> FrameSource for FrameLimit<S> {
    fn stream(&self) -> StreamLabel {
        self.inner.stream()
    }

    fn pull(&mut self) -> Result<Option<Frame>, CoreError> {
        match self.remaining {
            Some(0) => Ok(None),
            Some(ref mut n) => {
                *n -= 1;
                self.inner.pull()
            }
            None => self.inner.pull(),
        }
    }

    fn ordering_violations(&self) -> u64 {
        self.inner.ordering_violations()
    }
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let geometry = blueprint.payload;
        let matcher_config = blueprint.to_matcher_config();

        check_filename_geometry(blueprint, geometry);

        // Open both streams
        info!(
            a = %blueprint.streams.a.path.display(),
            b = %blueprint.streams.b.path.display(),
            "Opening frame files"
        );

        let cursor_a = FrameCursor::open(
            &blueprint.streams.a.path,
            StreamLabel::A,
            geometry,
            matcher_config.basis,
        )
        .with_context(|| {
            format!(
                "Failed to open stream A: {}",
                blueprint.streams.a.path.display()
            )
        })?;

        let cursor_b = FrameCursor::open(
            &blueprint.streams.b.path,
            StreamLabel::B,
            geometry,
            matcher_config.basis,
        )
        .with_context(|| {
            format!(
                "Failed to open stream B: {}",
                blueprint.streams.b.path.display()
            )
        })?;

        let source_a = FrameLimit::new(cursor_a, self.config.max_a_frames);

        // Run the match
        info!(
            max_time_diff_ns = matcher_config.max_time_diff_ns,
            basis = ?matcher_config.basis,
            max_a_frames = ?self.config.max_a_frames,
            "Starting coincidence search"
        );

        let matcher = CoincidenceMatcher::new(matcher_config, source_a, cursor_b);
        let outcome = matcher
            .run()
            .context("Matching aborted on stream corruption")?;

        info!(
            pairs = outcome.report.pairs,
            duplicates = outcome.report.duplicate_pairs,
            "Coincidence search complete"
        );

        // Dispatch records
        let records = match self.config.order {
            OutputOrder::Canonical => outcome.sorted_records(),
            OutputOrder::Emission => outcome.records(),
        };

        let mut pair_dispatcher = PairDispatcher::from_configs(&blueprint.sinks)
            .context("Failed to build sinks")?;
        let active_sinks = pair_dispatcher.len();

        let mut aggregator = MatchMetricsAggregator::new();
        for record in &records {
            record_pair_metrics(record);
            aggregator.update(record);
            pair_dispatcher
                .dispatch(record)
                .context("Failed to dispatch pair record")?;
        }

        record_match_report(&outcome.report);
        aggregator.finalize(outcome.report);

        pair_dispatcher.close().context("Failed to close sinks")?;

        Ok(PipelineStats {
            pairs_found: outcome.report.pairs,
            frames_read_a: outcome.report.frames_read_a,
            frames_read_b: outcome.report.frames_read_b,
            duration: start_time.elapsed(),
            active_sinks,
            match_metrics: aggregator,
        })
    }
}

/// Warn when a file name's bpp component disagrees with the configuration.
///
/// Configuration always wins; the mismatch usually means the wrong file or
/// the wrong geometry section.
fn check_filename_geometry(blueprint: &RunBlueprint, geometry: PayloadGeometry) {
    for (label, path) in [
        ("A", &blueprint.streams.a.path),
        ("B", &blueprint.streams.b.path),
    ] {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let info = parse_name(name);
        if let Some(bpp) = info.bytes_per_pixel {
            if bpp != geometry.bytes_per_pixel {
                warn!(
                    stream = label,
                    file = name,
                    file_bpp = bpp,
                    config_bpp = geometry.bytes_per_pixel,
                    "file name bytes-per-pixel disagrees with configured payload geometry"
                );
            }
        }
    }
}
