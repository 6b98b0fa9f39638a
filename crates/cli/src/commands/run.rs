//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{OrderArg, RunArgs};
use crate::pipeline::{OutputOrder, Pipeline, PipelineConfig};

/// Execute the `run` command
pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(tolerance) = args.max_time_diff_ns {
        info!(max_time_diff_ns = tolerance, "Overriding tolerance from CLI");
        blueprint.matching.max_time_diff_ns = tolerance;
    }
    if let Some(basis) = args.timestamp_basis {
        info!(basis = ?basis, "Overriding timestamp basis from CLI");
        blueprint.matching.timestamp_basis = basis.into();
    }

    info!(
        a = %blueprint.streams.a.path.display(),
        b = %blueprint.streams.b.path.display(),
        max_time_diff_ns = blueprint.matching.max_time_diff_ns,
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        max_a_frames: if args.max_a_frames == 0 {
            None
        } else {
            Some(args.max_a_frames)
        },
        order: match args.order {
            OrderArg::Canonical => OutputOrder::Canonical,
            OrderArg::Emission => OutputOrder::Emission,
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run pipeline
    let pipeline = Pipeline::new(pipeline_config);

    info!("Starting pipeline...");

    let stats = pipeline.run().context("Pipeline execution failed")?;

    info!(
        pairs = stats.pairs_found,
        frames_a = stats.frames_read_a,
        frames_b = stats.frames_read_b,
        duration_secs = stats.duration.as_secs_f64(),
        "Pipeline completed successfully"
    );

    // Print detailed statistics
    stats.print_summary();

    info!("PH Coincidence finished");
    Ok(())
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::RunBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Streams:");
    println!("  A: {}", blueprint.streams.a.path.display());
    println!("  B: {}", blueprint.streams.b.path.display());

    println!("\nMatching:");
    println!("  Tolerance: {} ns", blueprint.matching.max_time_diff_ns);
    println!("  Basis: {:?}", blueprint.matching.timestamp_basis);

    println!("\nPayload:");
    println!(
        "  {}x{} pixels, {} byte(s) per pixel",
        blueprint.payload.side, blueprint.payload.side, blueprint.payload.bytes_per_pixel
    );

    if !blueprint.sinks.is_empty() {
        println!("\nSinks ({}):", blueprint.sinks.len());
        for sink in &blueprint.sinks {
            println!("  - {} ({:?})", sink.name, sink.sink_type);
        }
    }

    println!();
}
