//! Synthetic Match Demo
//!
//! Runs the coincidence matcher over two in-memory streams of jittered
//! timestamps, without touching the disk. Demonstrates the core streaming
//! join and the end-of-run report.
//!
//! Run with: cargo run --bin synthetic_match

use contracts::{MatcherConfig, StreamLabel, TimestampBasis};
use ingestion::MemoryFrameSource;
use match_engine::CoincidenceMatcher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FRAME_INTERVAL_NS: i64 = 1_000_000; // ~1 kHz per module
const JITTER_NS: i64 = 200;
const TOLERANCE_NS: u64 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Synthetic Match Demo");

    // ==== Stage 1: Generate two jittered, sorted timestamp streams ====
    let mut rng = StdRng::seed_from_u64(720);
    let base = 1_658_385_828_000_000_000i64;

    let stream_a: Vec<i64> = (0..10_000)
        .map(|i| base + i * FRAME_INTERVAL_NS + rng.random_range(-JITTER_NS..=JITTER_NS))
        .collect();
    let stream_b: Vec<i64> = (0..10_000)
        .map(|i| base + i * FRAME_INTERVAL_NS + rng.random_range(-JITTER_NS..=JITTER_NS))
        .collect();

    tracing::info!(
        frames_a = stream_a.len(),
        frames_b = stream_b.len(),
        tolerance_ns = TOLERANCE_NS,
        "Streams generated"
    );

    // ==== Stage 2: Run the streaming join ====
    let matcher = CoincidenceMatcher::new(
        MatcherConfig {
            max_time_diff_ns: TOLERANCE_NS,
            basis: TimestampBasis::Receive,
        },
        MemoryFrameSource::from_timestamps(StreamLabel::A, &stream_a),
        MemoryFrameSource::from_timestamps(StreamLabel::B, &stream_b),
    );
    let outcome = matcher.run()?;

    // ==== Stage 3: Report ====
    tracing::info!(
        pairs = outcome.report.pairs,
        duplicates = outcome.report.duplicate_pairs,
        peak_window_depth = outcome.report.peak_window_depth,
        evicted = outcome.report.evicted_b,
        "Match complete"
    );

    for record in outcome.sorted_records().iter().take(10) {
        println!(
            "A{:<6} B{:<6} diff {:>5} ns",
            record.a_index, record.b_index, record.diff_ns
        );
    }
    println!(
        "... {} pairs total, window never held more than {} frames",
        outcome.report.pairs, outcome.report.peak_window_depth
    );

    Ok(())
}
