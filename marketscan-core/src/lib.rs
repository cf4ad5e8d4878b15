//! MarketScan Core — indicator derivation and cross-sectional market queries.
//!
//! This crate contains the heart of the scanner:
//! - Domain types (daily bars, augmented indicator rows, company metadata)
//! - Indicator kernels (EMA/MACD, rolling means and extremes, 5-day OLS)
//! - The per-ticker series engine that derives the full column battery
//! - The cross-sectional table built by merging per-ticker series
//! - The movers/extremes query engine (top-10 lists, 52-week hits)
//! - Data provider traits with a Yahoo-backed implementation
//! - The CSV-backed company-info cache and the ticker universe

pub mod data;
pub mod domain;
pub mod indicators;
pub mod movers;
pub mod series;
pub mod table;
pub mod universe;
