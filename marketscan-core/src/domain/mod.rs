//! Domain types: bars, augmented rows, company metadata.

pub mod bar;
pub mod company;
pub mod row;

pub use bar::DailyBar;
pub use company::CompanyInfo;
pub use row::IndicatorRow;
