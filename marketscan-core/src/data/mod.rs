//! Data providers: price history and company metadata.
//!
//! The core owns the traits; the Yahoo implementations and the CSV
//! company-info cache live alongside them. Providers hand the series
//! engine well-formed ascending bar series — deduplication and
//! ordering are their responsibility.

pub mod company_cache;
pub mod provider;
pub mod yahoo;

pub use company_cache::CompanyCache;
pub use provider::{CompanyInfoProvider, DataError, PriceProvider};
pub use yahoo::YahooProvider;
