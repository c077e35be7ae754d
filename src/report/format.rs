//! Formatted terminal output for tracking runs.
//!
//! We keep formatting code in one place so:
//! - the cleaning/aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{DemographicCell, TrackingConfig, TrackingPoint};

/// Format the run summary (row accounting + configuration).
pub fn format_run_summary(run: &RunOutput, config: &TrackingConfig) -> String {
    let mut out = String::new();

    out.push_str("=== Electoral tracking ===\n");
    out.push_str(&format!("Candidate: {}\n", config.target_candidate));
    out.push_str(&format!(
        "Window: {} ({}) on {}\n",
        config.window_size, config.summary_function, config.target_column
    ));
    out.push_str(&format!(
        "Rows: read={} | retained={} | dropped: duplicate={} missing={} stratum={}\n",
        run.rows_read,
        run.cleaning.records.len(),
        run.cleaning.dropped_duplicate,
        run.cleaning.dropped_missing,
        run.cleaning.dropped_stratum,
    ));

    out
}

/// Format the leading rows of the demographic summary.
pub fn format_demographics(cells: &[DemographicCell], head: usize) -> String {
    let mut out = String::new();

    out.push_str("=== Demographic summary ===\n");
    if cells.is_empty() {
        out.push_str("(no rows with complete demographic keys)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<12} {:<10} {:<8} {:>6} {:>12} {:>12}\n",
        "date", "sex", "bracket", "n", "mean_image", "intention"
    ));
    out.push_str(&format!(
        "{:-<12} {:-<10} {:-<8} {:-<6} {:-<12} {:-<12}\n",
        "", "", "", "", "", ""
    ));

    for cell in cells.iter().take(head) {
        out.push_str(&format!(
            "{:<12} {:<10} {:<8} {:>6} {:>12.2} {:>12.3}\n",
            cell.date,
            truncate(&cell.sex, 10),
            cell.age_bracket.label(),
            cell.n,
            cell.mean_image,
            cell.mean_intention,
        ));
    }
    if cells.len() > head {
        out.push_str(&format!("... ({} groups total)\n", cells.len()));
    }

    out
}

/// Format the full daily tracking series.
pub fn format_tracking(tracking: &[TrackingPoint], config: &TrackingConfig) -> String {
    let mut out = String::new();

    out.push_str("=== Tracking series ===\n");
    if tracking.is_empty() {
        out.push_str("(no dates survived cleaning)\n");
        return out;
    }

    let smoothed_header = format!("{}(w={})", config.summary_function, config.window_size);
    out.push_str(&format!(
        "{:<12} {:>14} {:>12} {:>14}\n",
        "date", "intention", "image", smoothed_header
    ));
    out.push_str(&format!(
        "{:-<12} {:-<14} {:-<12} {:-<14}\n",
        "", "", "", ""
    ));

    for t in tracking {
        out.push_str(&format!(
            "{:<12} {:>14.4} {:>12.4} {:>14.4}\n",
            t.point.date, t.point.vote_intention, t.point.normalized_image, t.smoothed,
        ));
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
