//! IndicatorRow — a daily bar augmented with the derived column battery.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A `DailyBar` extended with every derived field the series engine
/// produces. Produced exactly once per input bar; recomputation over the
/// same input series is idempotent.
///
/// Nullable fields use `Option<f64>`: simple moving averages are null
/// until a full window of history exists, percent changes are null on
/// the first row, and the 5-day regression fields are null for the
/// first four rows of each ticker's series. Rolling extremes use
/// min-periods-1 semantics and are defined from the first row, so they
/// are plain `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,

    // MACD family (defined from the first row: EMA seeded with first close)
    pub ema_12: f64,
    pub ema_26: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,

    // Simple moving averages (null until the window is full)
    pub ma_5: Option<f64>,
    pub ma_50: Option<f64>,
    pub ma_250: Option<f64>,
    pub volume_ma_5: Option<f64>,
    pub volume_ma_50: Option<f64>,
    pub volume_ma_250: Option<f64>,

    /// (volume[t] - volume[t-1]) / volume[t-1] * 100; null on the first row.
    pub daily_volume_pct_change: Option<f64>,

    // Trailing rolling extremes, min-periods 1
    pub low_1m: f64,
    pub high_1m: f64,
    pub low_3m: f64,
    pub high_3m: f64,
    pub low_52w: f64,
    pub high_52w: f64,
    pub low_5y: f64,
    pub high_5y: f64,

    // Percent distance from extremes: (close - extreme) / extreme * 100
    pub pct_diff_3m_low: f64,
    pub pct_diff_3m_high: f64,
    pub pct_diff_52w_low: f64,
    pub pct_diff_52w_high: f64,

    /// 1 if low[t] == low_52w[t], else 0 (same-day equality).
    pub hit_52w_low: u8,
    /// 1 if high[t] == high_52w[t], else 0.
    pub hit_52w_high: u8,

    /// (close[t] - close[t-1]) / close[t-1] * 100; null on the first row.
    pub pct_change: Option<f64>,

    // 5-day OLS regression of close against session index {0..4};
    // null for the first four rows of each ticker's series.
    pub slope_5d: Option<f64>,
    pub r_squared_5d: Option<f64>,
    pub p_value_5d: Option<f64>,
}
