//! Property tests for the series engine and movers invariants.
//!
//! Uses proptest to verify:
//! 1. Row count and date order are preserved for any input series
//! 2. Regression fields are null exactly on the first four rows and
//!    R²/p-value stay within [0, 1] afterwards
//! 3. Hit flags agree with rolling-extreme equality; extremes bound
//!    the day's low/high
//! 4. Recomputation is idempotent
//! 5. Mover lists are bounded, sorted per their key, and stable

use chrono::NaiveDate;
use proptest::prelude::*;

use marketscan_core::data::DataError;
use marketscan_core::domain::{CompanyInfo, DailyBar};
use marketscan_core::movers::{CompanySource, MoversEngine, TOP_N};
use marketscan_core::series::augment_series;
use marketscan_core::table::AugmentedTable;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_close() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|c| (c * 100.0).round() / 100.0)
}

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_close(), 1..40)
}

/// Close vectors with at least two sessions, so percent change is
/// defined on the queried date.
fn arb_closes_multi_session() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_close(), 2..40)
}

fn make_bars(symbol: &str, closes: &[f64]) -> Vec<DailyBar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            DailyBar {
                symbol: symbol.to_string(),
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000 + 7 * i as u64,
            }
        })
        .collect()
}

struct NoCompanies;

impl CompanySource for NoCompanies {
    fn company_info(&mut self, ticker: &str) -> Result<CompanyInfo, DataError> {
        Err(DataError::SymbolNotFound {
            symbol: ticker.to_string(),
        })
    }
}

proptest! {
    /// One output row per input bar, dates preserved in order.
    #[test]
    fn row_count_and_dates_preserved(closes in arb_closes()) {
        let bars = make_bars("X", &closes);
        let rows = augment_series(&bars);
        prop_assert_eq!(rows.len(), bars.len());
        for (bar, row) in bars.iter().zip(&rows) {
            prop_assert_eq!(bar.date, row.date);
        }
    }

    /// Regression fields: null for index < 4, defined with bounded
    /// R² and p-value for index >= 4.
    #[test]
    fn regression_null_prefix_and_bounds(closes in arb_closes()) {
        let rows = augment_series(&make_bars("X", &closes));
        for (i, row) in rows.iter().enumerate() {
            if i < 4 {
                prop_assert!(row.slope_5d.is_none());
                prop_assert!(row.r_squared_5d.is_none());
                prop_assert!(row.p_value_5d.is_none());
            } else {
                prop_assert!(row.slope_5d.is_some());
                let r2 = row.r_squared_5d.unwrap();
                let p = row.p_value_5d.unwrap();
                prop_assert!((0.0..=1.0).contains(&r2));
                prop_assert!((0.0..=1.0).contains(&p));
            }
        }
    }

    /// Hit flags agree with the trailing-252-session extreme equality,
    /// and the extremes bound every day's low/high.
    #[test]
    fn hit_flags_match_window_extremes(closes in arb_closes()) {
        let bars = make_bars("X", &closes);
        let rows = augment_series(&bars);
        for (t, row) in rows.iter().enumerate() {
            let start = (t + 1).saturating_sub(252);
            let window_min = bars[start..=t].iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let window_max = bars[start..=t].iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(row.low_52w, window_min);
            prop_assert_eq!(row.high_52w, window_max);
            prop_assert!(row.low_52w <= bars[t].low);
            prop_assert!(row.high_52w >= bars[t].high);
            prop_assert_eq!(row.hit_52w_low == 1, bars[t].low == window_min);
            prop_assert_eq!(row.hit_52w_high == 1, bars[t].high == window_max);
        }
    }

    /// Running the engine twice on the same series yields identical rows.
    #[test]
    fn recomputation_is_idempotent(closes in arb_closes()) {
        let bars = make_bars("X", &closes);
        prop_assert_eq!(augment_series(&bars), augment_series(&bars));
    }

    /// Mover lists are bounded by TOP_N and sorted per their key.
    #[test]
    fn mover_lists_bounded_and_sorted(
        tickers in prop::collection::vec(arb_closes_multi_session(), 1..15),
    ) {
        let series: Vec<_> = tickers
            .iter()
            .enumerate()
            .map(|(i, closes)| augment_series(&make_bars(&format!("T{i:02}"), closes)))
            .collect();
        let table = AugmentedTable::from_series(series);

        // The last session every generated ticker has a row on; every
        // ticker is past its first session there, so percent change is
        // defined and the risers/fallers rankings are non-empty.
        let shared_sessions = tickers.iter().map(Vec::len).min().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
            + chrono::Duration::days(shared_sessions as i64 - 1);

        let mut engine = MoversEngine::new(&table, NoCompanies);
        let movers = engine.top_movers(date).unwrap();

        for list in &movers.lists {
            prop_assert!(list.entries.len() <= TOP_N);
        }
        prop_assert!(!movers.lists[0].entries.is_empty());
        prop_assert!(!movers.lists[1].entries.is_empty());

        // Closest-to-low ascends, closest-to-high descends.
        let low_keys: Vec<f64> = movers.lists[2]
            .entries
            .iter()
            .map(|e| e.row.pct_diff_52w_low)
            .collect();
        prop_assert!(low_keys.windows(2).all(|w| w[0] <= w[1]));

        let high_keys: Vec<f64> = movers.lists[3]
            .entries
            .iter()
            .map(|e| e.row.pct_diff_52w_high)
            .collect();
        prop_assert!(high_keys.windows(2).all(|w| w[0] >= w[1]));

        // Risers descend, fallers ascend, by percent change.
        let riser_keys: Vec<f64> = movers.lists[0]
            .entries
            .iter()
            .map(|e| e.row.pct_change.unwrap())
            .collect();
        prop_assert!(riser_keys.windows(2).all(|w| w[0] >= w[1]));

        let faller_keys: Vec<f64> = movers.lists[1]
            .entries
            .iter()
            .map(|e| e.row.pct_change.unwrap())
            .collect();
        prop_assert!(faller_keys.windows(2).all(|w| w[0] <= w[1]));
    }
}
