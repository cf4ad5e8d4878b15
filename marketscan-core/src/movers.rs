//! Movers/Extremes Query Engine.
//!
//! Cross-sectional queries over the augmented table for a single date:
//! four ranked top-10 lists (risers, fallers, closest to 52-week
//! low/high) and the sets of tickers that hit a new 52-week extreme.
//! Company metadata is attached via a constructor-time lookup
//! dependency with fetch-or-cache semantics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::data::DataError;
use crate::domain::{CompanyInfo, IndicatorRow};
use crate::table::AugmentedTable;

/// Maximum entries per mover list.
pub const TOP_N: usize = 10;

/// The closed set of mover list kinds.
///
/// Unknown kinds cannot exist by construction; selection is a tagged
/// variant rather than a stringly-typed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoverKind {
    Risers,
    Fallers,
    ClosestTo52wLow,
    ClosestTo52wHigh,
}

impl MoverKind {
    pub const ALL: [MoverKind; 4] = [
        MoverKind::Risers,
        MoverKind::Fallers,
        MoverKind::ClosestTo52wLow,
        MoverKind::ClosestTo52wHigh,
    ];

    /// Human-readable list label, used in tabular export.
    pub fn label(&self) -> &'static str {
        match self {
            MoverKind::Risers => "Top 10 Risers",
            MoverKind::Fallers => "Top 10 Fallers",
            MoverKind::ClosestTo52wLow => "Closest to 52 Week Low",
            MoverKind::ClosestTo52wHigh => "Closest to 52 Week High",
        }
    }

    /// The ranking key for a row, or None if the row cannot be compared
    /// numerically (excluded from this ranking only).
    fn key(&self, row: &IndicatorRow) -> Option<f64> {
        let raw = match self {
            MoverKind::Risers | MoverKind::Fallers => row.pct_change?,
            MoverKind::ClosestTo52wLow => row.pct_diff_52w_low,
            MoverKind::ClosestTo52wHigh => row.pct_diff_52w_high,
        };
        raw.is_finite().then_some(raw)
    }

    /// Sort direction. "Closest to low" ascends by signed percent
    /// difference, so a stock below its 52-week low sorts first.
    fn descending(&self) -> bool {
        matches!(self, MoverKind::Risers | MoverKind::ClosestTo52wHigh)
    }
}

/// One ranked row with its company metadata attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoverEntry {
    pub row: IndicatorRow,
    pub company: CompanyInfo,
}

/// A ranked, truncated list of movers of one kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoverList {
    pub kind: MoverKind,
    pub entries: Vec<MoverEntry>,
}

/// The four mover lists for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopMovers {
    pub date: NaiveDate,
    pub lists: Vec<MoverList>,
}

/// A ticker that hit its 52-week low or high on a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtremeHit {
    pub symbol: String,
    pub close: f64,
    /// The 52-week extreme that was touched.
    pub extreme: f64,
}

/// Tickers that hit a new 52-week low/high on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtremeHits {
    pub date: NaiveDate,
    pub lows: Vec<ExtremeHit>,
    pub highs: Vec<ExtremeHit>,
}

/// Query errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no rows for date {date} (non-trading day or outside the ingested range)")]
    EmptyDate { date: NaiveDate },

    #[error("the augmented table is empty")]
    EmptyTable,
}

/// Company metadata lookup capability handed to the engine.
///
/// Implemented by `CompanyCache`; tests supply in-memory fakes.
pub trait CompanySource {
    fn company_info(&mut self, ticker: &str) -> Result<CompanyInfo, DataError>;
}

/// The query engine: a read-only table plus a metadata source.
pub struct MoversEngine<'a, C> {
    table: &'a AugmentedTable,
    companies: C,
}

impl<'a, C: CompanySource> MoversEngine<'a, C> {
    pub fn new(table: &'a AugmentedTable, companies: C) -> Self {
        Self { table, companies }
    }

    /// The four ranked top-10 lists for a date.
    ///
    /// Each list is independently sorted and truncated; ties keep the
    /// original table order (stable sort). Rows without a numeric key
    /// are excluded from that one ranking. A metadata fetch failure
    /// leaves the company fields null but keeps the row in the list.
    pub fn top_movers(&mut self, date: NaiveDate) -> Result<TopMovers, ScanError> {
        let rows = self.table.rows_on(date);
        if rows.is_empty() {
            return Err(ScanError::EmptyDate { date });
        }

        let lists = MoverKind::ALL
            .iter()
            .map(|&kind| {
                let ranked = rank(&rows, kind);
                let entries = ranked
                    .into_iter()
                    .map(|row| MoverEntry {
                        row: row.clone(),
                        company: self.lookup(&row.symbol),
                    })
                    .collect();
                MoverList { kind, entries }
            })
            .collect();

        Ok(TopMovers { date, lists })
    }

    /// Tickers that hit their 52-week low/high on a date; defaults to
    /// the latest date present in the table.
    pub fn extremes_on(&self, date: Option<NaiveDate>) -> Result<ExtremeHits, ScanError> {
        let date = match date {
            Some(d) => d,
            None => self.table.latest_date().ok_or(ScanError::EmptyTable)?,
        };
        let rows = self.table.rows_on(date);
        if rows.is_empty() {
            return Err(ScanError::EmptyDate { date });
        }

        let mut lows = Vec::new();
        let mut highs = Vec::new();
        for row in rows {
            if row.hit_52w_low == 1 {
                lows.push(ExtremeHit {
                    symbol: row.symbol.clone(),
                    close: row.close,
                    extreme: row.low_52w,
                });
            }
            if row.hit_52w_high == 1 {
                highs.push(ExtremeHit {
                    symbol: row.symbol.clone(),
                    close: row.close,
                    extreme: row.high_52w,
                });
            }
        }

        Ok(ExtremeHits { date, lows, highs })
    }

    fn lookup(&mut self, ticker: &str) -> CompanyInfo {
        match self.companies.company_info(ticker) {
            Ok(info) => info,
            Err(e) => {
                warn!(ticker, error = %e, "company info fetch failed; leaving fields null");
                CompanyInfo::unknown(ticker)
            }
        }
    }
}

/// Stable-sort rows by the kind's key and truncate to `TOP_N`.
fn rank<'r>(rows: &[&'r IndicatorRow], kind: MoverKind) -> Vec<&'r IndicatorRow> {
    let mut keyed: Vec<(&IndicatorRow, f64)> = rows
        .iter()
        .filter_map(|row| kind.key(row).map(|k| (*row, k)))
        .collect();

    // Keys are finite by construction, so partial_cmp never fails;
    // sort_by is stable, preserving table order among equal keys.
    if kind.descending() {
        keyed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    } else {
        keyed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    }

    keyed.truncate(TOP_N);
    keyed.into_iter().map(|(row, _)| row).collect()
}
