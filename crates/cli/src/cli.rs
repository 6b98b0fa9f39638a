//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::TimestampBasis;
use std::path::PathBuf;

/// PH Coincidence - coincident pulse-height frame finder
#[derive(Parser, Debug)]
#[command(
    name = "ph-coincidence",
    author,
    version,
    about = "Find coincident pulse-height frames across two detector modules",
    long_about = "Streams two time-ordered pulse-height frame files and reports every \n\
                  pair of frames whose timestamps differ by no more than a configured \n\
                  tolerance, in a single bounded-memory pass.\n\n\
                  Matched pairs are routed to configured sinks (log, CSV, JSON)."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "PH_COINCIDENCE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "PH_COINCIDENCE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the coincidence search
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Inspect a frame file
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "run.toml", env = "PH_COINCIDENCE_CONFIG")]
    pub config: PathBuf,

    /// Override matching tolerance in nanoseconds from configuration
    #[arg(long, env = "PH_COINCIDENCE_MAX_TIME_DIFF_NS")]
    pub max_time_diff_ns: Option<u64>,

    /// Override timestamp basis from configuration
    #[arg(long, value_enum, env = "PH_COINCIDENCE_TIMESTAMP_BASIS")]
    pub timestamp_basis: Option<BasisArg>,

    /// Stop after this many stream-A frames (0 = unlimited)
    #[arg(long, default_value = "0", env = "PH_COINCIDENCE_MAX_A_FRAMES")]
    pub max_a_frames: u64,

    /// Output ordering for matched pairs
    #[arg(long, value_enum, default_value = "canonical")]
    pub order: OrderArg,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "PH_COINCIDENCE_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "run.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Frame file to inspect
    pub file: PathBuf,

    /// Image side length in pixels
    #[arg(long, default_value = "16")]
    pub side: u16,

    /// Bytes per pixel (defaults to the file name's bpp component, else 2)
    #[arg(long)]
    pub bytes_per_pixel: Option<u8>,

    /// Timestamp basis for the reported time range
    #[arg(long, value_enum, default_value = "receive")]
    pub timestamp_basis: BasisArg,

    /// Stop after this many frames (0 = all)
    #[arg(long, default_value = "0")]
    pub limit: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Timestamp basis selector
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BasisArg {
    /// Host receive second + GPS nanosecond (tv_sec * 1e9 + pkt_nsec)
    Receive,
    /// Pure GPS clock (pkt_utc * 1e9 + pkt_nsec)
    PacketUtc,
}

impl From<BasisArg> for TimestampBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::Receive => TimestampBasis::Receive,
            BasisArg::PacketUtc => TimestampBasis::PacketUtc,
        }
    }
}

/// Output ordering for matched pairs
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderArg {
    /// Sorted by (stream-A index, stream-B index)
    #[default]
    Canonical,
    /// As emitted by the matcher
    Emission,
}
