//! nodestitch CLI - stitch candidate detections into trajectories
//!
//! Usage:
//!   nodestitch-cli --in <candidates.txt> --out <paths.txt> [--format no,i,j,lon,lat]
//!                  [--range 5.0] [--minlength 3] [--maxgap 0] [--out-format std|visit]
//!
//! The input lists, for each time step, a header line
//! `day month year count hour` followed by `count` candidate lines.

use clap::Parser;
use log::{error, info};
use nodestitch::{DEFAULT_FORMAT, OutputFormat, RunConfig, StitchConfig, run};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nodestitch-cli")]
#[command(about = "Stitch per-time-step candidates into feature trajectories", long_about = None)]
struct Cli {
    /// Candidate list to read
    #[arg(long = "in")]
    input: Option<PathBuf>,

    /// File to write paths to
    #[arg(long = "out")]
    output: Option<PathBuf>,

    /// Candidate column names; must include "lat" and "lon"
    #[arg(long, default_value = DEFAULT_FORMAT)]
    format: String,

    /// Maximum distance between linked candidates (degrees)
    #[arg(long, default_value = "5.0")]
    range: f64,

    /// Minimum number of nodes in a kept path
    #[arg(long, default_value = "3")]
    minlength: usize,

    /// Number of time steps that may be skipped between linked candidates
    #[arg(long, default_value = "0")]
    maxgap: usize,

    /// Output layout (std|visit)
    #[arg(long = "out-format", alias = "out_format", default_value = "std")]
    out_format: String,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let output_format = match cli.out_format.parse::<OutputFormat>() {
        Ok(format) => format,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = RunConfig {
        input: cli.input,
        output: cli.output,
        format: cli.format,
        stitch: StitchConfig {
            range_degrees: cli.range,
            min_path_length: cli.minlength,
            max_gap: cli.maxgap,
        },
        output_format,
    };

    match run(&config) {
        Ok(summary) => {
            info!(
                "Done: {} time steps, {} candidates, {} segments, {} paths kept ({} discarded)",
                summary.stats.time_steps,
                summary.stats.candidates,
                summary.stats.segments,
                summary.stats.paths_found,
                summary.stats.paths_discarded
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
