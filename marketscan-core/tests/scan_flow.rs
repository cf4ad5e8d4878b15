//! End-to-end flow: bars → series engine → table → movers/extremes.

use chrono::NaiveDate;
use marketscan_core::data::DataError;
use marketscan_core::domain::{CompanyInfo, DailyBar};
use marketscan_core::movers::{CompanySource, MoverKind, MoversEngine, ScanError};
use marketscan_core::series::augment_series;
use marketscan_core::table::AugmentedTable;

fn bars(symbol: &str, closes: &[f64]) -> Vec<DailyBar> {
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
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 10_000 + 100 * i as u64,
            }
        })
        .collect()
}

/// Company source that knows every ticker.
struct AllKnown;

impl CompanySource for AllKnown {
    fn company_info(&mut self, ticker: &str) -> Result<CompanyInfo, DataError> {
        Ok(CompanyInfo {
            ticker: ticker.to_string(),
            short_name: Some(format!("{ticker} Holdings")),
            industry: Some("Testing".into()),
            sector: Some("Technology".into()),
        })
    }
}

#[test]
fn full_flow_two_tickers() {
    let a = augment_series(&bars("AAA", &[10.0, 11.0, 9.0, 12.0, 13.0, 14.0, 10.0, 9.0]));
    let b = augment_series(&bars("BBB", &[50.0, 52.0, 51.0]));
    let table = AugmentedTable::from_series([a, b]);

    // 8 + 3 rows survive the merge.
    assert_eq!(table.len(), 11);

    // Third session: both tickers have a row.
    let date = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
    let mut engine = MoversEngine::new(&table, AllKnown);
    let movers = engine.top_movers(date).unwrap();

    assert_eq!(movers.lists.len(), 4);
    assert_eq!(movers.lists[0].kind, MoverKind::Risers);
    // AAA fell 9->... on session 3 AAA pct = (9-11)/11, BBB = (51-52)/52.
    let fallers = &movers.lists[1];
    assert_eq!(fallers.entries[0].row.symbol, "AAA");
    assert_eq!(
        fallers.entries[0].company.short_name.as_deref(),
        Some("AAA Holdings")
    );
}

#[test]
fn short_history_ticker_ranks_without_regression() {
    let a = augment_series(&bars("LONG", &[10.0, 11.0, 9.0, 12.0, 13.0]));
    let b = augment_series(&bars("TINY", &[50.0, 55.0]));
    let table = AugmentedTable::from_series([a, b]);

    let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    let mut engine = MoversEngine::new(&table, AllKnown);
    let movers = engine.top_movers(date).unwrap();

    let risers = &movers.lists[0];
    let tiny = risers
        .entries
        .iter()
        .find(|e| e.row.symbol == "TINY")
        .expect("3-bar ticker must be ranked on its second session");
    assert!((tiny.row.pct_change.unwrap() - 10.0).abs() < 1e-10);
    assert!(tiny.row.slope_5d.is_none());
    assert!(tiny.row.r_squared_5d.is_none());
    assert!(tiny.row.p_value_5d.is_none());
}

#[test]
fn date_with_no_rows_surfaces_empty_date() {
    let table = AugmentedTable::from_series([augment_series(&bars("AAA", &[10.0, 11.0]))]);
    let mut engine = MoversEngine::new(&table, AllKnown);
    let missing = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    match engine.top_movers(missing) {
        Err(ScanError::EmptyDate { date }) => assert_eq!(date, missing),
        other => panic!("expected EmptyDate, got {other:?}"),
    }
}

#[test]
fn extremes_annotated_with_close_and_extreme() {
    let up = augment_series(&bars("UP", &[10.0, 12.0, 15.0]));
    let down = augment_series(&bars("DN", &[30.0, 25.0, 20.0]));
    let table = AugmentedTable::from_series([up, down]);

    let engine = MoversEngine::new(&table, AllKnown);
    let hits = engine.extremes_on(None).unwrap();

    let high = hits.highs.iter().find(|h| h.symbol == "UP").unwrap();
    assert_eq!(high.close, 15.0);
    assert_eq!(high.extreme, 15.5); // high = max(open, close) + 0.5

    let low = hits.lows.iter().find(|h| h.symbol == "DN").unwrap();
    assert_eq!(low.close, 20.0);
    assert_eq!(low.extreme, 19.5);
}
