//! AugmentedTable — the cross-sectional merge of per-ticker series.
//!
//! A pure structural concatenation: no recomputation happens here.
//! Per-ticker row order is preserved, and the table is read-only once
//! built. The latest-snapshot view (one row per ticker, maximum date)
//! backs "current state" queries, distinct from the arbitrary-date path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::IndicatorRow;

/// All tickers' augmented rows, keyed by (ticker, date).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AugmentedTable {
    rows: Vec<IndicatorRow>,
}

impl AugmentedTable {
    /// Build a table by concatenating per-ticker row sequences, in the
    /// order given.
    pub fn from_series(series: impl IntoIterator<Item = Vec<IndicatorRow>>) -> Self {
        let mut rows = Vec::new();
        for ticker_rows in series {
            rows.extend(ticker_rows);
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows on a given date, in table order.
    pub fn rows_on(&self, date: NaiveDate) -> Vec<&IndicatorRow> {
        self.rows.iter().filter(|r| r.date == date).collect()
    }

    /// The maximum date present across all tickers (the last trading
    /// day the table knows about). None for an empty table.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).max()
    }

    /// One row per ticker: the row with that ticker's maximum date.
    ///
    /// Tickers appear in first-seen table order. Per-ticker series are
    /// date-ascending by precondition, so the last row per ticker wins.
    pub fn latest_snapshot(&self) -> Vec<&IndicatorRow> {
        let mut order: Vec<&str> = Vec::new();
        let mut latest: std::collections::HashMap<&str, &IndicatorRow> =
            std::collections::HashMap::new();
        for row in &self.rows {
            let replace = match latest.get(row.symbol.as_str()) {
                Some(existing) => existing.date < row.date,
                None => {
                    order.push(row.symbol.as_str());
                    true
                }
            };
            if replace {
                latest.insert(row.symbol.as_str(), row);
            }
        }
        order.into_iter().map(|sym| latest[sym]).collect()
    }
}
