//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    stream_a: String,
    stream_b: String,
    max_time_diff_ns: u64,
    timestamp_basis: String,
    payload: String,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    stream_a: blueprint.streams.a.path.display().to_string(),
                    stream_b: blueprint.streams.b.path.display().to_string(),
                    max_time_diff_ns: blueprint.matching.max_time_diff_ns,
                    timestamp_basis: format!("{:?}", blueprint.matching.timestamp_basis),
                    payload: format!(
                        "{}x{}x{}",
                        blueprint.payload.side,
                        blueprint.payload.side,
                        blueprint.payload.bytes_per_pixel
                    ),
                    sink_count: blueprint.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &contracts::RunBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    // Check for empty sinks
    if blueprint.sinks.is_empty() {
        warnings.push(
            "No sinks configured - matched pairs will only appear in the run summary".to_string(),
        );
    }

    // Matching a file against itself flags every pair as a duplicate
    if blueprint.streams.a.path == blueprint.streams.b.path {
        warnings.push(format!(
            "Stream A and B are the same file ({}) - every pair will be a duplicate observation",
            blueprint.streams.a.path.display()
        ));
    }

    // Check the streams exist (run would fail later)
    for (label, path) in [("A", &blueprint.streams.a.path), ("B", &blueprint.streams.b.path)] {
        if !path.exists() {
            warnings.push(format!(
                "Stream {} file does not exist: {}",
                label,
                path.display()
            ));
        }
    }

    // File-name geometry vs configured geometry
    for (label, path) in [("A", &blueprint.streams.a.path), ("B", &blueprint.streams.b.path)] {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if let Some(bpp) = ingestion::parse_name(name).bytes_per_pixel {
                if bpp != blueprint.payload.bytes_per_pixel {
                    warnings.push(format!(
                        "Stream {} file name says bpp_{} but [payload] configures {} byte(s) per pixel",
                        label, bpp, blueprint.payload.bytes_per_pixel
                    ));
                }
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Stream A: {}", summary.stream_a);
            println!("  Stream B: {}", summary.stream_b);
            println!("  Tolerance: {} ns", summary.max_time_diff_ns);
            println!("  Basis: {}", summary.timestamp_basis);
            println!("  Payload: {}", summary.payload);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
