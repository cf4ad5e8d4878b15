//! Rolling-window kernels: mean, min, max, and percent change.
//!
//! Two window conventions coexist in the column battery:
//! - `rolling_mean` requires a full window (NaN until `window` inputs
//!   exist), matching the moving-average columns.
//! - `rolling_min` / `rolling_max` use min-periods-1: the statistic is
//!   computed over whatever prefix of the window is available, so it is
//!   defined from the first input.

/// Rolling mean over a trailing window; NaN until the window is full.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "rolling window must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < window {
        return result;
    }

    let mut sum: f64 = values.iter().take(window).sum();
    result[window - 1] = sum / window as f64;

    for i in window..n {
        sum = sum - values[i - window] + values[i];
        result[i] = sum / window as f64;
    }

    result
}

/// Rolling minimum over a trailing window, min-periods 1.
///
/// The window at index `t` is `values[t+1-window ..= t]` clipped to the
/// start of the series, so every index has a defined value.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |a, b| a.min(b))
}

/// Rolling maximum over a trailing window, min-periods 1.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |a, b| a.max(b))
}

fn rolling_extreme(values: &[f64], window: usize, fold: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    assert!(window >= 1, "rolling window must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    // Window sizes here top out at 1250 sessions; a rescan per index is
    // plain and fast enough for daily data.
    for i in 0..n {
        let start = (i + 1).saturating_sub(window);
        let mut acc = values[start];
        for &v in &values[start + 1..=i] {
            acc = fold(acc, v);
        }
        result[i] = acc;
    }

    result
}

/// Day-over-day percent change: (x[t] - x[t-1]) / x[t-1] * 100.
/// NaN on the first index.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    for i in 1..n {
        result[i] = (values[i] - values[i - 1]) / values[i - 1] * 100.0;
    }
    result
}
