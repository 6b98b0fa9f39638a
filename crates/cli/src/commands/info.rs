//! `info` command implementation.
//!
//! Streams through one frame file and reports record count, time range, and
//! capture metadata, without holding more than one frame in memory.

use anyhow::{Context, Result};
use contracts::{FrameSource, PayloadGeometry, StreamLabel, TimestampBasis};
use ingestion::{parse_name, FrameCursor};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Inspection result for JSON output
#[derive(Serialize)]
struct FileInfo {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    module: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<String>,
    geometry: String,
    frames: u64,
    truncated_at_limit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_timestamp_ns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_timestamp_ns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    span_ns: Option<i64>,
    ordering_violations: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_frame_meta: Option<serde_json::Value>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    if !args.file.exists() {
        anyhow::bail!("Frame file not found: {}", args.file.display());
    }

    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let name_info = parse_name(&file_name);

    // Explicit flag wins, then the file name's bpp component, then default
    let bytes_per_pixel = args
        .bytes_per_pixel
        .or(name_info.bytes_per_pixel)
        .unwrap_or(2);
    let geometry = PayloadGeometry {
        side: args.side,
        bytes_per_pixel,
    };
    let basis: TimestampBasis = args.timestamp_basis.into();

    info!(
        file = %args.file.display(),
        side = geometry.side,
        bytes_per_pixel = geometry.bytes_per_pixel,
        "Inspecting frame file"
    );

    let mut cursor = FrameCursor::open(&args.file, StreamLabel::A, geometry, basis)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    let mut frames = 0u64;
    let mut first_ts: Option<i64> = None;
    let mut last_ts: Option<i64> = None;
    let mut first_meta: Option<serde_json::Value> = None;
    let mut truncated = false;

    while let Some(frame) = cursor
        .pull()
        .with_context(|| format!("Corrupt record in {}", args.file.display()))?
    {
        let ts = frame.timestamp_ns(basis);
        if frames == 0 {
            first_ts = Some(ts);
            first_meta = Some(serde_json::to_value(&frame.meta)?);
        }
        last_ts = Some(ts);
        frames += 1;

        if args.limit != 0 && frames >= args.limit {
            truncated = true;
            break;
        }
    }

    let result = FileInfo {
        file: args.file.display().to_string(),
        module: name_info.module,
        data_product: name_info.data_product,
        start: name_info.start,
        geometry: format!("{}x{}x{}", geometry.side, geometry.side, geometry.bytes_per_pixel),
        frames,
        truncated_at_limit: truncated,
        first_timestamp_ns: first_ts,
        last_timestamp_ns: last_ts,
        span_ns: match (first_ts, last_ts) {
            (Some(first), Some(last)) => Some(last - first),
            _ => None,
        },
        ordering_violations: cursor.ordering_violations(),
        first_frame_meta: first_meta,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_file_info(&result);
    }

    Ok(())
}

fn print_file_info(info: &FileInfo) {
    println!("\n=== Frame File Info ===\n");
    println!("File: {}", info.file);
    if let Some(module) = info.module {
        println!("Module: {}", module);
    }
    if let Some(ref dp) = info.data_product {
        println!("Data product: {}", dp);
    }
    if let Some(ref start) = info.start {
        println!("Observation start: {}", start);
    }
    println!("Geometry: {}", info.geometry);
    println!(
        "Frames: {}{}",
        info.frames,
        if info.truncated_at_limit {
            " (stopped at --limit)"
        } else {
            ""
        }
    );
    if let (Some(first), Some(last), Some(span)) =
        (info.first_timestamp_ns, info.last_timestamp_ns, info.span_ns)
    {
        println!("First timestamp: {} ns", first);
        println!("Last timestamp:  {} ns", last);
        println!("Span: {:.3} s", span as f64 / 1e9);
    }
    if info.ordering_violations > 0 {
        println!("⚠ Ordering violations: {}", info.ordering_violations);
    }
    if let Some(ref meta) = info.first_frame_meta {
        println!("\nFirst frame metadata:");
        println!("{}", serde_json::to_string_pretty(meta).unwrap_or_default());
    }
    println!();
}
