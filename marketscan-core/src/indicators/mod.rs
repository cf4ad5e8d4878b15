//! Indicator kernels.
//!
//! Each kernel maps an input f64 series to a same-length output vector,
//! using `f64::NAN` for positions where the statistic is undefined.
//! The series engine converts NaN to `None` when assembling rows, so
//! the NaN convention stays internal to this module.
//!
//! All kernels are trailing-window only: the value at index `t` depends
//! on inputs at or before `t`, never after (no look-ahead).

pub mod ema;
pub mod regression;
pub mod rolling;

pub use ema::ema_of_series;
pub use regression::{rolling_regression, RegressionSeries};
pub use rolling::{pct_change, rolling_max, rolling_mean, rolling_min};

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev close (or close for the first
/// bar), high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// volume = 1000 + 10 * index.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::DailyBar> {
    use crate::domain::DailyBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            DailyBar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000 + 10 * i as u64,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
