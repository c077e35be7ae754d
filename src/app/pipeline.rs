//! Shared tracking pipeline used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> clean -> demographic summary -> daily series -> smoothing
//!
//! The CLI can then focus on presentation (printing and the chart).

use log::info;

use crate::aggregate;
use crate::clean::{self, CleanOutcome};
use crate::domain::{DailyPoint, DemographicCell, TrackingConfig, TrackingPoint};
use crate::error::AppError;
use crate::io::ingest;
use crate::window;

/// All computed outputs of a single tracking run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub rows_read: usize,
    pub cleaning: CleanOutcome,
    pub demographics: Vec<DemographicCell>,
    pub tracking: Vec<TrackingPoint>,
}

/// Execute the full tracking pipeline and return the computed outputs.
///
/// Single pass, no retries: the first stage failure propagates and aborts
/// the run.
pub fn run_tracking(config: &TrackingConfig) -> Result<RunOutput, AppError> {
    // 1) Load and type-coerce the survey file.
    let loaded = ingest::load_survey(&config.csv_path)?;

    // 2) Per-row cleaning and derived variables.
    let cleaning = clean::clean_survey(&loaded.rows, &config.target_candidate);
    info!(
        "cleaned: {} of {} rows retained",
        cleaning.records.len(),
        cleaning.rows_in
    );

    // 3) Demographic summary for reporting.
    let demographics = aggregate::demographic_summary(&cleaning.records);

    // 4) Daily series + rolling smoothing of the target column.
    let daily = aggregate::daily_series(&cleaning.records);
    let series = target_column_values(&daily, &config.target_column)?;
    let smoothed = window::apply(&series, config.window_size, &config.summary_function)?;

    let tracking = daily
        .iter()
        .zip(smoothed)
        .map(|(point, smoothed)| TrackingPoint {
            point: *point,
            smoothed,
        })
        .collect();

    Ok(RunOutput {
        rows_read: loaded.rows_read,
        cleaning,
        demographics,
        tracking,
    })
}

/// Resolve the configured target column against the daily series.
fn target_column_values(daily: &[DailyPoint], column: &str) -> Result<Vec<f64>, AppError> {
    match column {
        "VoteIntention" => Ok(daily.iter().map(|p| p.vote_intention).collect()),
        "NormalizedImage" => Ok(daily.iter().map(|p| p.normalized_image).collect()),
        _ => Err(AppError::data_format(format!(
            "Unknown target column `{column}` (expected `VoteIntention` or `NormalizedImage`)."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn daily(day: u32, intention: f64, image: f64) -> DailyPoint {
        DailyPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            vote_intention: intention,
            normalized_image: image,
        }
    }

    #[test]
    fn target_column_resolves_both_series() {
        let series = vec![daily(1, 0.25, 0.5), daily(2, 0.75, 0.9)];
        assert_eq!(
            target_column_values(&series, "VoteIntention").unwrap(),
            vec![0.25, 0.75]
        );
        assert_eq!(
            target_column_values(&series, "NormalizedImage").unwrap(),
            vec![0.5, 0.9]
        );
    }

    #[test]
    fn unknown_target_column_is_a_format_error() {
        let err = target_column_values(&[], "Turnout").unwrap_err();
        assert!(matches!(err, AppError::DataFormat { .. }));
    }

    #[test]
    fn full_run_over_a_small_survey_file() {
        let csv = "date,survey_id,stratum,sex,age,candidate_image_score,vote,previous_vote\n\
             2024-01-02,S3,alto,M,50,60,Candidate B,Candidate B\n\
             2024-01-01,S1,bajo,F,25,80,candidate a,Candidate B\n\
             2024-01-01,S2,medio,M,40,60,Candidate B,Candidate A\n\
             2024-01-01,S2,medio,M,40,60,Candidate B,Candidate A\n\
             2024-01-02,S4,desconocido,F,30,70,Candidate A,Candidate A\n";
        let path = std::env::temp_dir().join("poll-tracker-pipeline-run.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let config = TrackingConfig {
            csv_path: path,
            window_size: 2,
            chart_path: None,
            ..TrackingConfig::default()
        };
        let run = run_tracking(&config).unwrap();

        assert_eq!(run.rows_read, 5);
        assert_eq!(run.cleaning.dropped_duplicate, 1);
        assert_eq!(run.cleaning.dropped_stratum, 1);
        assert_eq!(run.cleaning.records.len(), 3);

        // Day 1: intentions (1, 0) -> 0.5; day 2: (0) -> 0.0.
        assert_eq!(run.tracking.len(), 2);
        assert!((run.tracking[0].point.vote_intention - 0.5).abs() < 1e-12);
        assert!((run.tracking[0].smoothed - 0.5).abs() < 1e-12);
        assert!((run.tracking[1].smoothed - 0.25).abs() < 1e-12);

        // Demographics: one group per surviving (date, sex, bracket) key.
        assert_eq!(run.demographics.len(), 3);
    }
}
