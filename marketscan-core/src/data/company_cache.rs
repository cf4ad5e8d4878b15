//! CSV-backed company-info cache with fetch-or-cache semantics.
//!
//! The cache file holds one record per ticker (`Ticker, Short Name,
//! Industry, Sector`), loaded in full on open. Lookups hit the map
//! first; a miss invokes the wrapped provider once, stores the result,
//! and rewrites the file. Keys are write-once and the provider is never
//! retried: a failed fetch is stored as a null record, so a dead ticker
//! costs one provider call for the life of the cache file.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::warn;

use super::provider::{CompanyInfoProvider, DataError};
use crate::domain::CompanyInfo;
use crate::movers::CompanySource;

const HEADER: [&str; 4] = ["Ticker", "Short Name", "Industry", "Sector"];

/// Process-wide company metadata cache, keyed by ticker.
pub struct CompanyCache<P> {
    path: Option<PathBuf>,
    entries: HashMap<String, CompanyInfo>,
    provider: P,
}

impl<P: CompanyInfoProvider> CompanyCache<P> {
    /// Open a cache backed by a CSV file. A missing file is an empty
    /// cache, created on the first successful fetch.
    pub fn open(path: impl Into<PathBuf>, provider: P) -> Result<Self, DataError> {
        let path = path.into();
        let entries = if path.exists() {
            load_csv(&path)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path: Some(path),
            entries,
            provider,
        })
    }

    /// A cache with no backing file, for tests and one-shot runs.
    pub fn in_memory(provider: P) -> Self {
        Self {
            path: None,
            entries: HashMap::new(),
            provider,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&CompanyInfo> {
        self.entries.get(ticker)
    }

    /// Cached value if present; otherwise fetch once, store, persist.
    ///
    /// A fetch failure is cached as a null record: later lookups for
    /// the same ticker return the nulls without touching the provider.
    pub fn get_or_fetch(&mut self, ticker: &str) -> Result<CompanyInfo, DataError> {
        if let Some(info) = self.entries.get(ticker) {
            return Ok(info.clone());
        }
        let info = match self.provider.fetch_info(ticker) {
            Ok(info) => info,
            Err(e) => {
                warn!(ticker, error = %e, "company info fetch failed; caching null record");
                CompanyInfo::unknown(ticker)
            }
        };
        self.entries.insert(ticker.to_string(), info.clone());
        self.persist()?;
        Ok(info)
    }

    /// Rewrite the backing file from the in-memory map, tickers sorted
    /// for a stable file layout.
    fn persist(&self) -> Result<(), DataError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut wtr = csv::Writer::from_path(path)
            .map_err(|e| DataError::CacheError(format!("open {}: {e}", path.display())))?;
        wtr.write_record(HEADER)
            .map_err(|e| DataError::CacheError(format!("write header: {e}")))?;

        let mut tickers: Vec<&String> = self.entries.keys().collect();
        tickers.sort();
        for ticker in tickers {
            let info = &self.entries[ticker];
            wtr.write_record([
                info.ticker.as_str(),
                info.short_name.as_deref().unwrap_or(""),
                info.industry.as_deref().unwrap_or(""),
                info.sector.as_deref().unwrap_or(""),
            ])
            .map_err(|e| DataError::CacheError(format!("write record: {e}")))?;
        }
        wtr.flush()
            .map_err(|e| DataError::CacheError(format!("flush: {e}")))?;
        Ok(())
    }
}

impl<P: CompanyInfoProvider> CompanySource for CompanyCache<P> {
    fn company_info(&mut self, ticker: &str) -> Result<CompanyInfo, DataError> {
        self.get_or_fetch(ticker)
    }
}

fn load_csv(path: &PathBuf) -> Result<HashMap<String, CompanyInfo>, DataError> {
    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| DataError::CacheError(format!("open {}: {e}", path.display())))?;
    let mut entries = HashMap::new();
    for record in rdr.records() {
        let record = record.map_err(|e| DataError::CacheError(format!("read record: {e}")))?;
        let ticker = record.get(0).unwrap_or("").trim();
        if ticker.is_empty() {
            continue;
        }
        let field = |i: usize| -> Option<String> {
            record
                .get(i)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        entries.insert(
            ticker.to_string(),
            CompanyInfo {
                ticker: ticker.to_string(),
                short_name: field(1),
                industry: field(2),
                sector: field(3),
            },
        );
    }
    Ok(entries)
}
