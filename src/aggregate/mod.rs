//! Demographic and daily aggregation over cleaned records.
//!
//! Two independent reductions:
//!
//! - a demographic summary grouped by `(date, sex, age bracket)`
//! - a daily series of mean vote intention and mean normalized image
//!
//! Only rows with every grouping key present join a group; a row without a
//! sex or age bracket still counts toward the daily series.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{AgeBracket, CleanRecord, DailyPoint, DemographicCell};

/// Group by `(date, sex, age bracket)` and average image and intention.
///
/// Output order: date ascending, then sex in first-appearance order, then
/// age bracket in bin order. Empty groups are not materialized.
pub fn demographic_summary(records: &[CleanRecord]) -> Vec<DemographicCell> {
    // Sex is an unordered category; first appearance fixes its sort position.
    let mut sexes: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<(NaiveDate, usize, AgeBracket), (usize, f64, f64)> = BTreeMap::new();

    for r in records {
        let Some(sex) = r.sex.as_deref() else {
            continue;
        };
        let Some(bracket) = r.age_bracket else {
            continue;
        };

        let sex_idx = match sexes.iter().position(|s| *s == sex) {
            Some(idx) => idx,
            None => {
                sexes.push(sex);
                sexes.len() - 1
            }
        };

        let entry = groups.entry((r.date, sex_idx, bracket)).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += r.candidate_image_score;
        entry.2 += f64::from(r.vote_intention);
    }

    groups
        .into_iter()
        .map(|((date, sex_idx, age_bracket), (n, image_sum, intention_sum))| DemographicCell {
            date,
            sex: sexes[sex_idx].to_string(),
            age_bracket,
            n,
            mean_image: image_sum / n as f64,
            mean_intention: intention_sum / n as f64,
        })
        .collect()
}

/// Group by date and average vote intention and normalized image.
pub fn daily_series(records: &[CleanRecord]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, (usize, f64, f64)> = BTreeMap::new();

    for r in records {
        let entry = days.entry(r.date).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += f64::from(r.vote_intention);
        entry.2 += r.normalized_image;
    }

    days.into_iter()
        .map(|(date, (n, intention_sum, image_sum))| DailyPoint {
            date,
            vote_intention: intention_sum / n as f64,
            normalized_image: image_sum / n as f64,
        })
        .collect()
}
