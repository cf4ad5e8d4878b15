//! Ticker universe — the closed set of selectable ticker lists.
//!
//! List selection is a tagged enum with a typed error for unknown
//! names, not a stringly-typed fallback that silently returns an empty
//! list. Index memberships (S&P 500/400/600) come from a TOML config
//! file; the magnificent-seven and bitcoin lists are built in; the two
//! watchlists load from single-column CSV files (a missing file is an
//! empty list).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Every selectable ticker list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickerList {
    Sp500,
    Sp400,
    Sp600,
    /// Union of the S&P 500, 400, and 600.
    Sp1500,
    MagnificentSeven,
    Bitcoin,
    StocksInterest,
    MyStocks,
    /// Deduplicated union of everything above.
    BigList,
}

impl TickerList {
    pub const ALL: [TickerList; 9] = [
        TickerList::Sp500,
        TickerList::Sp400,
        TickerList::Sp600,
        TickerList::Sp1500,
        TickerList::MagnificentSeven,
        TickerList::Bitcoin,
        TickerList::StocksInterest,
        TickerList::MyStocks,
        TickerList::BigList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TickerList::Sp500 => "sp500",
            TickerList::Sp400 => "sp400",
            TickerList::Sp600 => "sp600",
            TickerList::Sp1500 => "sp1500",
            TickerList::MagnificentSeven => "magnificent_seven",
            TickerList::Bitcoin => "bitcoin",
            TickerList::StocksInterest => "stocks_interest",
            TickerList::MyStocks => "my_stocks",
            TickerList::BigList => "big_list",
        }
    }
}

impl FromStr for TickerList {
    type Err = UniverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TickerList::ALL
            .into_iter()
            .find(|list| list.as_str() == s)
            .ok_or_else(|| UniverseError::UnknownList {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("unknown ticker list '{name}' (known: sp500, sp400, sp600, sp1500, magnificent_seven, bitcoin, stocks_interest, my_stocks, big_list)")]
    UnknownList { name: String },

    #[error("failed to read universe file: {0}")]
    Io(String),

    #[error("failed to parse universe file: {0}")]
    Parse(String),
}

const MAGNIFICENT_SEVEN: [&str; 7] = ["AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA"];

const BITCOIN: [&str; 11] = [
    "GBTC", "IBIT", "FBTC", "ARKB", "BITB", "BTCO", "HODL", "BRRR", "MARA", "COIN", "MSTR",
];

/// Index membership section of the universe TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IndexLists {
    #[serde(default)]
    sp500: Vec<String>,
    #[serde(default)]
    sp400: Vec<String>,
    #[serde(default)]
    sp600: Vec<String>,
}

/// The resolved universe: configured index lists plus watchlists.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    index_lists: IndexLists,
    stocks_interest: Vec<String>,
    my_stocks: Vec<String>,
}

impl Universe {
    /// A universe with only the built-in lists available.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load index memberships from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path).map_err(|e| UniverseError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse index memberships from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        let index_lists: IndexLists =
            toml::from_str(content).map_err(|e| UniverseError::Parse(e.to_string()))?;
        Ok(Self {
            index_lists,
            ..Self::default()
        })
    }

    /// Attach watchlists from single-column (`ticker`) CSV files.
    /// A missing file is an empty list, matching fetch-time behavior.
    pub fn with_watchlists(mut self, stocks_interest: &Path, my_stocks: &Path) -> Self {
        self.stocks_interest = load_watchlist(stocks_interest);
        self.my_stocks = load_watchlist(my_stocks);
        self
    }

    /// Resolve a list kind to its tickers.
    pub fn resolve(&self, list: TickerList) -> Vec<String> {
        match list {
            TickerList::Sp500 => self.index_lists.sp500.clone(),
            TickerList::Sp400 => self.index_lists.sp400.clone(),
            TickerList::Sp600 => self.index_lists.sp600.clone(),
            TickerList::Sp1500 => {
                let mut all = self.index_lists.sp500.clone();
                all.extend(self.index_lists.sp400.iter().cloned());
                all.extend(self.index_lists.sp600.iter().cloned());
                all
            }
            TickerList::MagnificentSeven => {
                MAGNIFICENT_SEVEN.iter().map(|s| s.to_string()).collect()
            }
            TickerList::Bitcoin => BITCOIN.iter().map(|s| s.to_string()).collect(),
            TickerList::StocksInterest => self.stocks_interest.clone(),
            TickerList::MyStocks => self.my_stocks.clone(),
            TickerList::BigList => {
                let mut seen = BTreeSet::new();
                let mut all = Vec::new();
                for list in [
                    TickerList::Sp1500,
                    TickerList::MagnificentSeven,
                    TickerList::Bitcoin,
                    TickerList::StocksInterest,
                    TickerList::MyStocks,
                ] {
                    for ticker in self.resolve(list) {
                        if seen.insert(ticker.clone()) {
                            all.push(ticker);
                        }
                    }
                }
                all
            }
        }
    }
}

/// Load tickers from a CSV file with a `ticker` column.
fn load_watchlist(path: &Path) -> Vec<String> {
    let Ok(mut rdr) = csv::Reader::from_path(path) else {
        return Vec::new();
    };
    let ticker_idx = rdr
        .headers()
        .ok()
        .and_then(|h| h.iter().position(|name| name.trim() == "ticker"));
    let Some(idx) = ticker_idx else {
        return Vec::new();
    };
    rdr.records()
        .filter_map(|rec| rec.ok())
        .filter_map(|rec| {
            rec.get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .collect()
}
