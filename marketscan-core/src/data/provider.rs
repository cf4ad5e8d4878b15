//! Provider traits and structured error types.
//!
//! The traits abstract over data sources (Yahoo Finance, fixtures in
//! tests) so the pipeline can swap implementations and mock for tests.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CompanyInfo, DailyBar};

/// Structured error types for data operations.
///
/// All of these are per-ticker and non-fatal to a batch: the pipeline
/// logs the failure, skips the ticker (or leaves metadata null), and
/// continues.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Supplies, per ticker, an ordered sequence of daily bars for a date
/// range. Implementations must return dates deduplicated and ascending;
/// the series engine does not validate this (documented precondition).
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over a date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, DataError>;
}

/// Supplies company metadata for a ticker on demand.
///
/// One synchronous call, no retry: a failure is tolerated and logged by
/// the caller, never escalated into aborting a batch.
pub trait CompanyInfoProvider: Send + Sync {
    fn fetch_info(&self, symbol: &str) -> Result<CompanyInfo, DataError>;
}
