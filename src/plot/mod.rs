//! Tracking chart rendering.
//!
//! Renders the daily series and its smoothed counterpart to a PNG via
//! Plotters' bitmap backend. The module is render-only: all series values
//! arrive precomputed, which keeps chart code out of the pipeline and makes
//! the data prep testable without drawing anything.

use std::path::Path;

use chrono::{Days, NaiveDate};
use plotters::prelude::*;

use crate::domain::{TrackingConfig, TrackingPoint};
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (1000, 500);

/// Render the tracking chart, creating parent directories as needed.
///
/// An existing file at `path` is overwritten.
pub fn render_tracking_chart(
    tracking: &[TrackingPoint],
    path: &Path,
    config: &TrackingConfig,
) -> Result<(), AppError> {
    if tracking.is_empty() {
        return Err(AppError::chart(
            "Cannot render chart: tracking series is empty.",
        ));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::chart(format!(
                    "Failed to create chart directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
    }

    draw_chart(tracking, path, config).map_err(|e| {
        AppError::chart(format!(
            "Failed to render chart '{}': {e}",
            path.display()
        ))
    })
}

fn draw_chart(
    tracking: &[TrackingPoint],
    path: &Path,
    config: &TrackingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x_range, y_range) = chart_bounds(tracking);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            "Electoral tracking (daily mean vs. window)",
            ("sans-serif", 22),
        )
        .set_label_area_size(LabelAreaPosition::Left, 55)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(format!("Vote intention: {}", config.target_candidate))
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .draw()?;

    let daily: Vec<(NaiveDate, f64)> = tracking
        .iter()
        .map(|t| (t.point.date, t.point.vote_intention))
        .collect();
    let smoothed: Vec<(NaiveDate, f64)> = tracking
        .iter()
        .map(|t| (t.point.date, t.smoothed))
        .collect();

    chart
        .draw_series(LineSeries::new(daily.iter().copied(), &BLUE))?
        .label("Daily mean")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));
    chart.draw_series(
        daily
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;

    chart
        .draw_series(LineSeries::new(
            smoothed.iter().copied(),
            RED.stroke_width(3),
        ))?
        .label(format!(
            "Window {} ({})",
            config.window_size, config.summary_function
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED.stroke_width(3)));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Axis bounds for the chart: the date span (at least one day wide) and the
/// value span over both plotted series with a small margin.
fn chart_bounds(tracking: &[TrackingPoint]) -> ((NaiveDate, NaiveDate), (f64, f64)) {
    let first = tracking[0].point.date;
    let mut last = tracking[tracking.len() - 1].point.date;
    if last == first {
        last = last.checked_add_days(Days::new(1)).unwrap_or(last);
    }

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for t in tracking {
        y_min = y_min.min(t.point.vote_intention).min(t.smoothed);
        y_max = y_max.max(t.point.vote_intention).max(t.smoothed);
    }

    let pad = ((y_max - y_min) * 0.1).max(0.02);
    ((first, last), (y_min - pad, y_max + pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyPoint;

    fn point(day: u32, intention: f64, smoothed: f64) -> TrackingPoint {
        TrackingPoint {
            point: DailyPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                vote_intention: intention,
                normalized_image: 0.5,
            },
            smoothed,
        }
    }

    #[test]
    fn bounds_cover_both_series_with_margin() {
        let tracking = vec![point(1, 0.2, 0.2), point(2, 0.6, 0.4)];
        let ((first, last), (y_min, y_max)) = chart_bounds(&tracking);
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(y_min < 0.2);
        assert!(y_max > 0.6);
    }

    #[test]
    fn single_date_span_widens_to_one_day() {
        let tracking = vec![point(1, 0.5, 0.5)];
        let ((first, last), _) = chart_bounds(&tracking);
        assert!(last > first);
    }

    #[test]
    fn empty_series_is_a_chart_error() {
        let config = TrackingConfig::default();
        let err =
            render_tracking_chart(&[], Path::new("/tmp/never-written.png"), &config).unwrap_err();
        assert!(matches!(err, AppError::Chart { .. }));
    }
}
