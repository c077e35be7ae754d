//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - validates the input path
//! - runs the tracking pipeline
//! - prints the demographic and tracking reports
//! - renders the optional chart

use clap::Parser;

use crate::cli::Cli;
use crate::domain::TrackingConfig;
use crate::error::AppError;

pub mod pipeline;

/// Leading demographic rows shown on the console (`head`-style preview).
const DEMOGRAPHIC_HEAD: usize = 5;

/// Entry point for the `tracker` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::init();

    let cli = Cli::parse();
    let config = tracking_config_from_args(&cli);

    if !config.csv_path.exists() {
        return Err(AppError::MissingFile {
            path: config.csv_path.clone(),
        });
    }

    let run = pipeline::run_tracking(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    println!(
        "{}",
        crate::report::format_demographics(&run.demographics, DEMOGRAPHIC_HEAD)
    );
    println!("{}", crate::report::format_tracking(&run.tracking, &config));

    if let Some(path) = &config.chart_path {
        crate::plot::render_tracking_chart(&run.tracking, path, &config)?;
        println!("Chart saved to {}", path.display());
    }

    Ok(())
}

pub fn tracking_config_from_args(args: &Cli) -> TrackingConfig {
    TrackingConfig {
        csv_path: args.csv.clone(),
        window_size: args.window,
        summary_function: args.summary.tag().to_string(),
        target_column: args.target_column.clone(),
        target_candidate: args.candidate.clone(),
        chart_path: if args.no_chart {
            None
        } else {
            Some(args.chart.clone())
        },
    }
}
