//! Series Indicator Engine — one ticker's bars in, augmented rows out.
//!
//! Pure function of the input series plus fixed window parameters:
//! the same bars always produce byte-identical rows, regardless of how
//! many times the engine runs. Each kernel is computed once over the
//! full series, then the outputs are zipped row-wise.
//!
//! Every rolling statistic at index `t` depends only on bars at or
//! before `t` — the kernels are trailing-window by construction.

use crate::domain::{DailyBar, IndicatorRow};
use crate::indicators::{
    ema_of_series, pct_change, rolling_max, rolling_mean, rolling_min, rolling_regression,
};

/// Fixed window parameters of the column battery (trading sessions).
pub const WINDOW_1M: usize = 21;
pub const WINDOW_3M: usize = 63;
pub const WINDOW_52W: usize = 252;
pub const WINDOW_5Y: usize = 1250;
pub const REGRESSION_WINDOW: usize = 5;

/// Derive the full indicator battery for one ticker's ordered bars.
///
/// Output has exactly one row per input bar, in the same order.
/// A series with fewer than five bars produces fully valid rows except
/// the regression fields, which stay null throughout.
pub fn augment_series(bars: &[DailyBar]) -> Vec<IndicatorRow> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

    let ema_12 = ema_of_series(&closes, 12);
    let ema_26 = ema_of_series(&closes, 26);
    let macd_line: Vec<f64> = ema_12
        .iter()
        .zip(&ema_26)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let macd_signal = ema_of_series(&macd_line, 9);

    let ma_5 = rolling_mean(&closes, 5);
    let ma_50 = rolling_mean(&closes, 50);
    let ma_250 = rolling_mean(&closes, 250);
    let volume_ma_5 = rolling_mean(&volumes, 5);
    let volume_ma_50 = rolling_mean(&volumes, 50);
    let volume_ma_250 = rolling_mean(&volumes, 250);

    let volume_change = pct_change(&volumes);
    let close_change = pct_change(&closes);

    let low_1m = rolling_min(&lows, WINDOW_1M);
    let high_1m = rolling_max(&highs, WINDOW_1M);
    let low_3m = rolling_min(&lows, WINDOW_3M);
    let high_3m = rolling_max(&highs, WINDOW_3M);
    let low_52w = rolling_min(&lows, WINDOW_52W);
    let high_52w = rolling_max(&highs, WINDOW_52W);
    let low_5y = rolling_min(&lows, WINDOW_5Y);
    let high_5y = rolling_max(&highs, WINDOW_5Y);

    let regression = rolling_regression(&closes, REGRESSION_WINDOW);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            symbol: bar.symbol.clone(),
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            ema_12: ema_12[i],
            ema_26: ema_26[i],
            macd_line: macd_line[i],
            macd_signal: macd_signal[i],
            macd_histogram: macd_line[i] - macd_signal[i],
            ma_5: nullable(ma_5[i]),
            ma_50: nullable(ma_50[i]),
            ma_250: nullable(ma_250[i]),
            volume_ma_5: nullable(volume_ma_5[i]),
            volume_ma_50: nullable(volume_ma_50[i]),
            volume_ma_250: nullable(volume_ma_250[i]),
            daily_volume_pct_change: nullable(volume_change[i]),
            low_1m: low_1m[i],
            high_1m: high_1m[i],
            low_3m: low_3m[i],
            high_3m: high_3m[i],
            low_52w: low_52w[i],
            high_52w: high_52w[i],
            low_5y: low_5y[i],
            high_5y: high_5y[i],
            pct_diff_3m_low: pct_diff(bar.close, low_3m[i]),
            pct_diff_3m_high: pct_diff(bar.close, high_3m[i]),
            pct_diff_52w_low: pct_diff(bar.close, low_52w[i]),
            pct_diff_52w_high: pct_diff(bar.close, high_52w[i]),
            hit_52w_low: u8::from(bar.low == low_52w[i]),
            hit_52w_high: u8::from(bar.high == high_52w[i]),
            pct_change: nullable(close_change[i]),
            slope_5d: nullable(regression.slope[i]),
            r_squared_5d: nullable(regression.r_squared[i]),
            p_value_5d: nullable(regression.p_value[i]),
        })
        .collect()
}

/// (close - extreme) / extreme * 100.
fn pct_diff(close: f64, extreme: f64) -> f64 {
    (close - extreme) / extreme * 100.0
}

fn nullable(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}
