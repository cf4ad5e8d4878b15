//! Scan pipeline — fetch and augment every ticker in a universe.
//!
//! Each ticker runs independently on a rayon worker: fetch the raw bars,
//! run the series engine, hand back the augmented rows. Fetch failures
//! and empty responses are logged and skipped; they never abort the
//! batch. The merge happens only after all tickers complete and keeps
//! the input ticker order.

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{info, warn};

use marketscan_core::data::PriceProvider;
use marketscan_core::domain::IndicatorRow;
use marketscan_core::series::augment_series;
use marketscan_core::table::AugmentedTable;

/// The result of one scan over a ticker universe.
#[derive(Debug)]
pub struct ScanOutcome {
    pub table: AugmentedTable,
    /// Tickers that produced rows.
    pub scanned: usize,
    /// Tickers skipped after a fetch failure or empty response, in
    /// input order.
    pub skipped: Vec<String>,
}

/// Fetch and augment every ticker in parallel, then merge.
///
/// A ticker whose fetch fails (or returns no bars) is skipped with a
/// warning. The merged table concatenates per-ticker row sequences in
/// the input ticker order regardless of worker completion order.
pub fn run_scan<P: PriceProvider>(
    provider: &P,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> ScanOutcome {
    info!(
        tickers = tickers.len(),
        provider = provider.name(),
        %start,
        %end,
        "starting scan"
    );

    let per_ticker: Vec<(usize, Option<Vec<IndicatorRow>>)> = tickers
        .par_iter()
        .enumerate()
        .map(|(idx, ticker)| match provider.fetch(ticker, start, end) {
            Ok(bars) if bars.is_empty() => {
                warn!(ticker = %ticker, "no bars returned; skipping");
                (idx, None)
            }
            Ok(bars) => (idx, Some(augment_series(&bars))),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "fetch failed; skipping");
                (idx, None)
            }
        })
        .collect();

    // par_iter + collect preserves input order, so a plain partition
    // keeps tickers in the order they were requested.
    let mut series = Vec::new();
    let mut skipped = Vec::new();
    for (idx, rows) in per_ticker {
        match rows {
            Some(rows) => series.push(rows),
            None => skipped.push(tickers[idx].clone()),
        }
    }

    let scanned = series.len();
    let table = AugmentedTable::from_series(series);
    info!(scanned, skipped = skipped.len(), rows = table.len(), "scan complete");

    ScanOutcome {
        table,
        scanned,
        skipped,
    }
}
