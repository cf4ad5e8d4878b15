//! Yahoo Finance providers.
//!
//! Price history comes from the v8 chart API; company metadata from the
//! v10 quoteSummary API. Yahoo has no official API and is subject to
//! unannounced format changes — parse failures surface as
//! `DataError::ResponseFormatChanged`.
//!
//! Calls are synchronous with no retry: one failure per ticker is
//! tolerated and logged upstream, never escalated into aborting a batch.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use super::provider::{CompanyInfoProvider, DataError, PriceProvider};
use crate::domain::{CompanyInfo, DailyBar};

// ── v8 chart API response ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

// ── v10 quoteSummary API response ───────────────────────────────────

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryData>>,
}

#[derive(Debug, Deserialize)]
struct SummaryData {
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
struct AssetProfile {
    industry: Option<String>,
    sector: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

/// Yahoo Finance provider for both bars and company metadata.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    fn summary_url(symbol: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{symbol}\
             ?modules=assetProfile,price"
        )
    }

    /// Parse the chart API response into bars, dropping rows with any
    /// missing quote field (Yahoo emits nulls for halted sessions) and
    /// rows that fail the OHLC sanity check (inverted ranges show up on
    /// thinly traded sessions).
    fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<DailyBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) =
                (open, high, low, close, volume)
            {
                let bar = DailyBar {
                    symbol: symbol.to_string(),
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                };
                if bar.is_sane() {
                    bars.push(bar);
                } else {
                    warn!(symbol, %date, "dropping bar that fails the OHLC sanity check");
                }
            }
        }

        Ok(bars)
    }

    fn parse_summary(symbol: &str, resp: SummaryResponse) -> Result<CompanyInfo, DataError> {
        let data = resp
            .quote_summary
            .result
            .and_then(|v| v.into_iter().next())
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;

        let profile = data.asset_profile;
        Ok(CompanyInfo {
            ticker: symbol.to_string(),
            short_name: data.price.and_then(|p| p.short_name),
            industry: profile.as_ref().and_then(|p| p.industry.clone()),
            sector: profile.as_ref().and_then(|p| p.sector.clone()),
        })
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let parsed: ChartResponse = resp
            .json()
            .map_err(|e| DataError::ResponseFormatChanged(e.to_string()))?;
        Self::parse_chart(symbol, parsed)
    }
}

impl CompanyInfoProvider for YahooProvider {
    fn fetch_info(&self, symbol: &str) -> Result<CompanyInfo, DataError> {
        let url = Self::summary_url(symbol);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let parsed: SummaryResponse = resp
            .json()
            .map_err(|e| DataError::ResponseFormatChanged(e.to_string()))?;
        Self::parse_summary(symbol, parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_encodes_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let url = YahooProvider::chart_url("AAPL", start, end);
        assert!(url.contains("/v8/finance/chart/AAPL"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn parse_chart_drops_null_rows() {
        let resp = ChartResponse {
            chart: ChartResult {
                result: Some(vec![ChartData {
                    timestamp: Some(vec![1_704_153_600, 1_704_240_000]),
                    indicators: Indicators {
                        quote: vec![QuoteData {
                            open: vec![Some(100.0), None],
                            high: vec![Some(105.0), Some(106.0)],
                            low: vec![Some(99.0), Some(100.0)],
                            close: vec![Some(103.0), Some(104.0)],
                            volume: vec![Some(1000), Some(1100)],
                        }],
                    },
                }]),
                error: None,
            },
        };
        let bars = YahooProvider::parse_chart("AAPL", resp).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 103.0);
    }

    #[test]
    fn parse_chart_drops_insane_bars() {
        // Second row has high below low; it must not survive parsing.
        let resp = ChartResponse {
            chart: ChartResult {
                result: Some(vec![ChartData {
                    timestamp: Some(vec![1_704_153_600, 1_704_240_000]),
                    indicators: Indicators {
                        quote: vec![QuoteData {
                            open: vec![Some(100.0), Some(101.0)],
                            high: vec![Some(105.0), Some(99.0)],
                            low: vec![Some(99.0), Some(100.0)],
                            close: vec![Some(103.0), Some(101.0)],
                            volume: vec![Some(1000), Some(1100)],
                        }],
                    },
                }]),
                error: None,
            },
        };
        let bars = YahooProvider::parse_chart("AAPL", resp).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 103.0);
    }

    #[test]
    fn parse_chart_maps_not_found() {
        let resp = ChartResponse {
            chart: ChartResult {
                result: None,
                error: Some(ChartError {
                    code: "Not Found".into(),
                    description: "No data found".into(),
                }),
            },
        };
        let err = YahooProvider::parse_chart("NOPE", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn parse_summary_fills_fields() {
        let resp = SummaryResponse {
            quote_summary: SummaryResult {
                result: Some(vec![SummaryData {
                    asset_profile: Some(AssetProfile {
                        industry: Some("Consumer Electronics".into()),
                        sector: Some("Technology".into()),
                    }),
                    price: Some(PriceModule {
                        short_name: Some("Apple Inc.".into()),
                    }),
                }]),
            },
        };
        let info = YahooProvider::parse_summary("AAPL", resp).unwrap();
        assert_eq!(info.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(info.sector.as_deref(), Some("Technology"));
    }
}
