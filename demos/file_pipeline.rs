//! File Pipeline Demo
//!
//! Writes two small frame files to a temp directory, then runs the full
//! path: cursors -> matcher -> CSV/JSON sinks, the same wiring the CLI's
//! `run` command performs.
//!
//! Run with: cargo run --bin file_pipeline

use std::collections::HashMap;
use std::io::Write;

use contracts::{
    MatcherConfig, PayloadGeometry, SinkConfig, SinkType, StreamLabel, TimestampBasis,
};
use dispatcher::PairDispatcher;
use ingestion::{synthetic_frame, write_record_u16, FrameCursor};
use match_engine::CoincidenceMatcher;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting File Pipeline Demo");

    let dir = tempfile::tempdir()?;
    let geometry = PayloadGeometry::default();
    let basis = TimestampBasis::Receive;

    // ==== Stage 1: Write two frame files ====
    let path_a = dir
        .path()
        .join("start_2022-07-21T06_03_03Z.dp_ph16.bpp_2.dome_0.module_1.seqno_0.pff");
    let path_b = dir
        .path()
        .join("start_2022-07-21T06_03_03Z.dp_ph16.bpp_2.dome_0.module_254.seqno_0.pff");

    let base = 1_658_385_828_000_000_000i64;
    write_frames(&path_a, StreamLabel::A, geometry, &[base, base + 200, base + 500])?;
    write_frames(
        &path_b,
        StreamLabel::B,
        geometry,
        &[base + 40, base + 170, base + 1_000],
    )?;

    tracing::info!(dir = %dir.path().display(), "Frame files written");

    // ==== Stage 2: Open cursors and run the matcher ====
    let matcher = CoincidenceMatcher::new(
        MatcherConfig {
            max_time_diff_ns: 100,
            basis,
        },
        FrameCursor::open(&path_a, StreamLabel::A, geometry, basis)?,
        FrameCursor::open(&path_b, StreamLabel::B, geometry, basis)?,
    );
    let outcome = matcher.run()?;

    tracing::info!(pairs = outcome.report.pairs, "Match complete");

    // ==== Stage 3: Dispatch to sinks ====
    let csv_path = dir.path().join("pairs.csv");
    let json_path = dir.path().join("pairs.json");
    let configs = vec![
        SinkConfig {
            name: "console".into(),
            sink_type: SinkType::Log,
            params: HashMap::new(),
        },
        SinkConfig {
            name: "table".into(),
            sink_type: SinkType::Csv,
            params: HashMap::from([("path".to_string(), csv_path.display().to_string())]),
        },
        SinkConfig {
            name: "document".into(),
            sink_type: SinkType::Json,
            params: HashMap::from([("path".to_string(), json_path.display().to_string())]),
        },
    ];

    let mut pair_dispatcher = PairDispatcher::from_configs(&configs)?;
    for record in outcome.sorted_records() {
        pair_dispatcher.dispatch(&record)?;
    }
    pair_dispatcher.close()?;

    println!("--- pairs.csv ---");
    println!("{}", std::fs::read_to_string(&csv_path)?);
    println!("--- pairs.json ---");
    println!("{}", std::fs::read_to_string(&json_path)?);

    Ok(())
}

fn write_frames(
    path: &std::path::Path,
    stream: StreamLabel,
    geometry: PayloadGeometry,
    timestamps_ns: &[i64],
) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    for (i, &ts) in timestamps_ns.iter().enumerate() {
        let frame = synthetic_frame(stream, i as u64, ts, geometry);
        let pixels = vec![0u16; geometry.pixel_count()];
        write_record_u16(&mut file, &frame.meta, &pixels)?;
    }
    file.flush()
}
