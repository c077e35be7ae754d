//! Survey cleaning rules and derived variables.
//!
//! The steps run in a fixed order because later rules depend on earlier
//! normalization (the vote-intention indicator compares title-cased values,
//! and the stratum filter runs on the raw text used by deduplication):
//!
//! 1. deduplicate on `(survey_id, raw stratum, sex, age)`, keeping the first
//! 2. drop rows missing any of {date, image score, vote, previous vote}
//! 3. normalize the stratum; rows with an unmappable stratum are dropped
//! 4. title-case + trim the vote fields
//! 5. derive the normalized image score
//! 6. derive the binary vote-intention indicator
//! 7. derive the age bracket (missing/out-of-range age keeps the row)
//!
//! Rows that fail a rule are dropped, not errors; the outcome carries drop
//! counts so runs stay auditable.

use std::collections::HashSet;

use log::debug;

use crate::domain::{AgeBracket, CleanRecord, Stratum, SurveyRow};

/// Cleaning output: surviving records plus drop accounting.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub records: Vec<CleanRecord>,
    pub rows_in: usize,
    pub dropped_duplicate: usize,
    pub dropped_missing: usize,
    pub dropped_stratum: usize,
}

/// Apply the cleaning rules to loaded survey rows.
///
/// Reapplying to already-clean data (canonical stratum labels, title-cased
/// votes) yields the same records.
pub fn clean_survey(rows: &[SurveyRow], target_candidate: &str) -> CleanOutcome {
    let target = title_case(target_candidate.trim());

    let mut seen: HashSet<(Option<&str>, Option<&str>, Option<&str>, Option<i64>)> =
        HashSet::new();
    let mut records = Vec::new();
    let mut dropped_duplicate = 0usize;
    let mut dropped_missing = 0usize;
    let mut dropped_stratum = 0usize;

    for (idx, row) in rows.iter().enumerate() {
        // 1) Duplicate respondent key. Missing components compare equal, so
        //    two rows that are both missing an id still deduplicate.
        let key = (
            row.survey_id.as_deref(),
            row.stratum_raw.as_deref(),
            row.sex.as_deref(),
            row.age,
        );
        if !seen.insert(key) {
            dropped_duplicate += 1;
            debug!("row {idx}: duplicate respondent key");
            continue;
        }

        // 2) Required fields.
        let (Some(date), Some(score), Some(vote), Some(previous_vote)) = (
            row.date,
            row.candidate_image_score,
            row.vote.as_deref(),
            row.previous_vote.as_deref(),
        ) else {
            dropped_missing += 1;
            debug!("row {idx}: missing required field");
            continue;
        };

        // 3) Stratum normalization.
        let Some(stratum) = row.stratum_raw.as_deref().and_then(Stratum::from_raw) else {
            dropped_stratum += 1;
            debug!("row {idx}: unmappable stratum {:?}", row.stratum_raw);
            continue;
        };

        // 4) Harmonize vote values.
        let vote = title_case(vote.trim());
        let previous_vote = title_case(previous_vote.trim());

        // 5) Image score normalized into [0, 1]. Out-of-range survey values
        //    are clipped, not rejected.
        let normalized_image = score.clamp(0.0, 100.0) / 100.0;

        // 6) Binary intention for the target candidate.
        let vote_intention = u8::from(vote == target);

        // 7) Age bracket.
        let age_bracket = AgeBracket::from_age(row.age);

        records.push(CleanRecord {
            date,
            survey_id: row.survey_id.clone(),
            stratum,
            sex: row.sex.clone(),
            age: row.age,
            education_level: row.education_level.clone(),
            household_size: row.household_size,
            candidate_image_score: score,
            vote,
            previous_vote,
            normalized_image,
            vote_intention,
            age_bracket,
        });
    }

    CleanOutcome {
        records,
        rows_in: rows.len(),
        dropped_duplicate,
        dropped_missing,
        dropped_stratum,
    }
}

/// Title-case a string: the first letter of each alphabetic run is
/// uppercased, the rest lowercased. Non-alphabetic characters delimit runs,
/// matching the usual spreadsheet/pandas `title` behavior.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_row(survey_id: &str, stratum: &str, vote: &str) -> SurveyRow {
        SurveyRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            survey_id: Some(survey_id.to_string()),
            stratum_raw: Some(stratum.to_string()),
            sex: Some("F".to_string()),
            age: Some(34),
            education_level: Some("Secundario".to_string()),
            household_size: Some(3),
            candidate_image_score: Some(62.0),
            vote: Some(vote.to_string()),
            previous_vote: Some("candidate b".to_string()),
        }
    }

    #[test]
    fn title_case_matches_survey_conventions() {
        assert_eq!(title_case("candidate a"), "Candidate A");
        assert_eq!(title_case("CANDIDATE B"), "Candidate B");
        assert_eq!(title_case("  voto en blanco"), "  Voto En Blanco");
        assert_eq!(title_case("o'neill"), "O'Neill");
    }

    #[test]
    fn target_matching_is_case_insensitive_via_title_case() {
        let rows = vec![
            sample_row("S1", "bajo", "Candidate A"),
            sample_row("S2", "bajo", "Candidate B"),
        ];
        let outcome = clean_survey(&rows, "candidate a");
        assert_eq!(outcome.records[0].vote_intention, 1);
        assert_eq!(outcome.records[1].vote_intention, 0);
    }

    #[test]
    fn stratum_values_normalize_and_unmappable_rows_drop() {
        let rows = vec![
            sample_row("S1", " Bajo ", "Candidate A"),
            sample_row("S2", "MEDIO", "Candidate A"),
            sample_row("S3", "alto", "Candidate A"),
            sample_row("S4", "desconocido", "Candidate A"),
        ];
        let outcome = clean_survey(&rows, "Candidate A");
        let strata: Vec<_> = outcome.records.iter().map(|r| r.stratum).collect();
        assert_eq!(strata, vec![Stratum::Bajo, Stratum::Medio, Stratum::Alto]);
        assert_eq!(outcome.dropped_stratum, 1);
    }

    #[test]
    fn duplicates_drop_keeping_first_occurrence() {
        let mut first = sample_row("S1", "bajo", "Candidate A");
        first.candidate_image_score = Some(80.0);
        let mut second = sample_row("S1", "bajo", "Candidate B");
        second.candidate_image_score = Some(20.0);

        let outcome = clean_survey(&[first, second], "Candidate A");
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped_duplicate, 1);
        assert_eq!(outcome.records[0].candidate_image_score, 80.0);
    }

    #[test]
    fn rows_with_all_key_fields_missing_still_deduplicate() {
        let empty = SurveyRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            candidate_image_score: Some(50.0),
            vote: Some("Candidate A".to_string()),
            previous_vote: Some("Candidate A".to_string()),
            ..SurveyRow::default()
        };
        let outcome = clean_survey(&[empty.clone(), empty], "Candidate A");
        assert_eq!(outcome.dropped_duplicate, 1);
    }

    #[test]
    fn missing_required_fields_drop_the_row() {
        let mut no_vote = sample_row("S1", "bajo", "Candidate A");
        no_vote.vote = None;
        let mut no_date = sample_row("S2", "bajo", "Candidate A");
        no_date.date = None;
        let mut no_score = sample_row("S3", "bajo", "Candidate A");
        no_score.candidate_image_score = None;

        let outcome = clean_survey(&[no_vote, no_date, no_score], "Candidate A");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.dropped_missing, 3);
    }

    #[test]
    fn derived_columns_respect_range_invariants() {
        let mut over = sample_row("S1", "bajo", "Candidate A");
        over.candidate_image_score = Some(130.0);
        let mut under = sample_row("S2", "medio", "Candidate B");
        under.candidate_image_score = Some(-5.0);
        let mut no_age = sample_row("S3", "alto", "Candidate A");
        no_age.age = None;

        let outcome = clean_survey(&[over, under, no_age], "Candidate A");
        for record in &outcome.records {
            assert!((0.0..=1.0).contains(&record.normalized_image));
            assert!(record.vote_intention <= 1);
        }
        assert_eq!(outcome.records[0].normalized_image, 1.0);
        assert_eq!(outcome.records[1].normalized_image, 0.0);
        // Missing age keeps the row, with no bracket.
        assert_eq!(outcome.records[2].age_bracket, None);
        assert_eq!(outcome.records.len(), 3);
    }

    #[test]
    fn cleaning_is_idempotent_on_clean_data() {
        let rows = vec![
            sample_row("S1", "bajo", "candidate a"),
            sample_row("S2", "MEDIO", "Candidate B"),
        ];
        let first = clean_survey(&rows, "Candidate A");

        // Feed the cleaned values back through as raw rows.
        let reclean_input: Vec<SurveyRow> = first
            .records
            .iter()
            .map(|r| SurveyRow {
                date: Some(r.date),
                survey_id: r.survey_id.clone(),
                stratum_raw: Some(r.stratum.label().to_string()),
                sex: r.sex.clone(),
                age: r.age,
                education_level: r.education_level.clone(),
                household_size: r.household_size,
                candidate_image_score: Some(r.candidate_image_score),
                vote: Some(r.vote.clone()),
                previous_vote: Some(r.previous_vote.clone()),
            })
            .collect();

        let second = clean_survey(&reclean_input, "Candidate A");
        assert_eq!(first.records, second.records);
    }
}
