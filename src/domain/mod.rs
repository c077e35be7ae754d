//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the run configuration (`TrackingConfig`)
//! - categorical survey dimensions (`Stratum`, `AgeBracket`)
//! - row types before and after cleaning (`SurveyRow`, `CleanRecord`)
//! - aggregation outputs (`DailyPoint`, `TrackingPoint`, `DemographicCell`)

pub mod types;

pub use types::*;
