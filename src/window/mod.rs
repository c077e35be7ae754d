//! Rolling-window smoothing.
//!
//! The window is trailing and shrinks at the start of the series (minimum
//! one observation), so every output row is defined. An explicit loop keeps
//! the boundary semantics obvious and the function pure: same length and
//! order as the input, input untouched.

use crate::error::AppError;

/// Reduce `values` over a trailing window of `window` rows.
///
/// Row `i` reduces over `[max(0, i - window + 1) ..= i]`. Supported
/// reduction tags are `mean`, `median`, and `sum`; the median of an
/// even-sized window is the mean of the two middle values.
pub fn apply(values: &[f64], window: i64, func: &str) -> Result<Vec<f64>, AppError> {
    if window <= 0 {
        return Err(AppError::InvalidWindow { window });
    }
    let reduce: fn(&[f64]) -> f64 = match func {
        "mean" => mean,
        "median" => median,
        "sum" => sum,
        _ => {
            return Err(AppError::UnsupportedWindowFunction {
                tag: func.to_string(),
            });
        }
    };

    let width = window as usize;
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(width);
        out.push(reduce(&values[start..=i]));
    }
    Ok(out)
}

fn sum(window: &[f64]) -> f64 {
    window.iter().sum()
}

fn mean(window: &[f64]) -> f64 {
    sum(window) / window.len() as f64
}

fn median(window: &[f64]) -> f64 {
    let mut sorted = window.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
