//! Command-line parsing for the electoral tracking pipeline.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! data-pipeline code.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Rolling summary selectable from the command line.
///
/// The windower also understands `sum`, but the tracking configuration
/// deliberately exposes only the two averaging reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryKind {
    Mean,
    Median,
}

impl SummaryKind {
    pub fn tag(self) -> &'static str {
        match self {
            SummaryKind::Mean => "mean",
            SummaryKind::Median => "median",
        }
    }
}

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tracker",
    version,
    about = "Electoral tracking: survey cleaning, demographics, and a smoothed daily series"
)]
pub struct Cli {
    /// Survey CSV to ingest.
    #[arg(long, default_value = "data/surveys.csv")]
    pub csv: PathBuf,

    /// Trailing window width (rows) for smoothing the daily series.
    #[arg(short = 'w', long, default_value_t = 3)]
    pub window: i64,

    /// Reduction applied over the window.
    #[arg(long, value_enum, default_value_t = SummaryKind::Mean)]
    pub summary: SummaryKind,

    /// Daily-series column the window is applied to.
    #[arg(long, default_value = "VoteIntention")]
    pub target_column: String,

    /// Candidate whose binary vote-intention indicator is tracked.
    #[arg(long, default_value = "Candidate A")]
    pub candidate: String,

    /// Where to write the tracking chart (PNG).
    #[arg(long, default_value = "output/tracking.png")]
    pub chart: PathBuf,

    /// Skip chart generation entirely.
    #[arg(long)]
    pub no_chart: bool,
}
