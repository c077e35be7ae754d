//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during cleaning and aggregation
//! - printed by the report module
//! - exported to JSON/CSV by downstream tooling

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Socioeconomic stratum, ordered `Bajo < Medio < Alto`.
///
/// Raw survey text is mapped through [`Stratum::from_raw`]; anything outside
/// the three canonical values has no stratum and the row is dropped by the
/// cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stratum {
    Bajo,
    Medio,
    Alto,
}

impl Stratum {
    /// Map a raw survey value (any case, surrounding whitespace) to a stratum.
    pub fn from_raw(raw: &str) -> Option<Stratum> {
        match raw.trim().to_lowercase().as_str() {
            "bajo" => Some(Stratum::Bajo),
            "medio" => Some(Stratum::Medio),
            "alto" => Some(Stratum::Alto),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stratum::Bajo => "Bajo",
            Stratum::Medio => "Medio",
            Stratum::Alto => "Alto",
        }
    }
}

impl std::fmt::Display for Stratum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Methodological age brackets, ordered by bin.
///
/// Bin edges are `(17, 29] (29, 44] (44, 59] (59, 120]` with inclusive right
/// ends; ages outside `[18, 120]` (or missing) have no bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    From18To29,
    From30To44,
    From45To59,
    From60Plus,
}

impl AgeBracket {
    pub fn from_age(age: Option<i64>) -> Option<AgeBracket> {
        match age? {
            18..=29 => Some(AgeBracket::From18To29),
            30..=44 => Some(AgeBracket::From30To44),
            45..=59 => Some(AgeBracket::From45To59),
            60..=120 => Some(AgeBracket::From60Plus),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::From18To29 => "18-29",
            AgeBracket::From30To44 => "30-44",
            AgeBracket::From45To59 => "45-59",
            AgeBracket::From60Plus => "60+",
        }
    }
}

impl std::fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One respondent as loaded from the CSV.
///
/// Every field is optional at this stage: the loader coerces what it can and
/// leaves the rest to the cleaner's drop rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyRow {
    pub date: Option<NaiveDate>,
    pub survey_id: Option<String>,
    pub stratum_raw: Option<String>,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub education_level: Option<String>,
    pub household_size: Option<i64>,
    pub candidate_image_score: Option<f64>,
    pub vote: Option<String>,
    pub previous_vote: Option<String>,
}

/// One respondent after cleaning.
///
/// The cleaning invariants are encoded in the types: required fields are no
/// longer optional, the stratum is canonical, vote fields are title-cased,
/// and the derived columns are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub date: NaiveDate,
    pub survey_id: Option<String>,
    pub stratum: Stratum,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub education_level: Option<String>,
    pub household_size: Option<i64>,
    pub candidate_image_score: f64,
    pub vote: String,
    pub previous_vote: String,
    /// `clip(candidate_image_score, 0, 100) / 100`, always in `[0, 1]`.
    pub normalized_image: f64,
    /// 1 iff `vote` matches the configured target candidate.
    pub vote_intention: u8,
    /// `None` when the age is missing or out of range; the row is kept.
    pub age_bracket: Option<AgeBracket>,
}

/// One row of the daily series: means over all respondents on a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub vote_intention: f64,
    pub normalized_image: f64,
}

/// A daily point plus its rolling-window smoothed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingPoint {
    pub point: DailyPoint,
    pub smoothed: f64,
}

/// One cell of the demographic summary, keyed by `(date, sex, age bracket)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicCell {
    pub date: NaiveDate,
    pub sex: String,
    pub age_bracket: AgeBracket,
    /// Respondent count in the group.
    pub n: usize,
    /// Mean of the raw (unclipped) image score.
    pub mean_image: f64,
    /// Mean of the binary vote-intention indicator.
    pub mean_intention: f64,
}

/// Immutable configuration for a tracking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Survey CSV to ingest.
    pub csv_path: PathBuf,
    /// Trailing window width (rows) for smoothing the daily series.
    pub window_size: i64,
    /// Reduction tag applied over the window (`mean` or `median` from the
    /// CLI; the windower additionally understands `sum`).
    pub summary_function: String,
    /// Daily-series column the window is applied to.
    pub target_column: String,
    /// Candidate whose binary vote-intention indicator is tracked.
    pub target_candidate: String,
    /// Where to write the chart; `None` skips chart generation.
    pub chart_path: Option<PathBuf>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            csv_path: PathBuf::from("data/surveys.csv"),
            window_size: 3,
            summary_function: "mean".to_string(),
            target_column: "VoteIntention".to_string(),
            target_candidate: "Candidate A".to_string(),
            chart_path: Some(PathBuf::from("output/tracking.png")),
        }
    }
}
