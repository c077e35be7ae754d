//! Survey CSV ingest and type coercion.
//!
//! This module turns a delimited survey export into typed [`SurveyRow`]s
//! sorted by date.
//!
//! Design goals:
//! - **Tolerant schema**: unknown columns are ignored, and declared columns
//!   that are absent simply load as `None`
//! - **Strict date axis**: a non-empty date value that does not parse is a
//!   fatal error, because every downstream table is keyed by date
//! - **Lenient values**: other fields coerce to `None` on bad input; the
//!   cleaner decides which of those rows survive
//! - **Separation of concerns**: no cleaning rules here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use log::info;

use crate::domain::SurveyRow;
use crate::error::AppError;

/// Ingest output: typed rows sorted ascending by date, plus read stats.
#[derive(Debug, Clone)]
pub struct LoadedSurvey {
    pub rows: Vec<SurveyRow>,
    pub rows_read: usize,
}

/// Load the survey CSV, coerce declared columns, and sort ascending by date.
///
/// The sort is stable: rows sharing a date keep their file order. Rows with
/// an empty date sort first and are dropped later by the cleaner.
pub fn load_survey(path: &Path) -> Result<LoadedSurvey, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::data_format(format!("Failed to open survey CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data_format(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    if !header_map.contains_key("date") {
        return Err(AppError::data_format("Missing required column: `date`"));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::data_format(format!("CSV parse error at line {line}: {e}")))?;
        rows.push(parse_row(&record, &header_map, line)?);
    }

    let rows_read = rows.len();
    rows.sort_by_key(|r| r.date);
    info!("loaded {rows_read} survey rows from '{}'", path.display());

    Ok(LoadedSurvey { rows, rows_read })
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
) -> Result<SurveyRow, AppError> {
    let date = match get_optional(record, header_map, "date") {
        Some(s) => Some(
            parse_date(s).map_err(|e| AppError::data_format(format!("Line {line}: {e}")))?,
        ),
        None => None,
    };

    Ok(SurveyRow {
        date,
        survey_id: get_optional(record, header_map, "survey_id").map(str::to_string),
        stratum_raw: get_optional(record, header_map, "stratum").map(str::to_string),
        sex: get_optional(record, header_map, "sex").map(str::to_string),
        age: parse_opt_i64(get_optional(record, header_map, "age")),
        education_level: get_optional(record, header_map, "education_level").map(str::to_string),
        household_size: parse_opt_i64(get_optional(record, header_map, "household_size")),
        candidate_image_score: parse_opt_f64(get_optional(
            record,
            header_map,
            "candidate_image_score",
        )),
        vote: get_optional(record, header_map, "vote").map(str::to_string),
        previous_vote: get_optional(record, header_map, "previous_vote").map(str::to_string),
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿date"). If we don't strip it, schema validation
    // will incorrectly report a missing date column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but field-work exports often use
    // `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small set of common formats
    // to reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn parse_opt_i64(s: Option<&str>) -> Option<i64> {
    s?.parse::<i64>().ok()
}
