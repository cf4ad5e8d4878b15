//! CompanyInfo — per-ticker metadata joined into mover lists.

use serde::{Deserialize, Serialize};

/// Company metadata for a single ticker.
///
/// All descriptive fields are optional: a failed metadata fetch leaves
/// them null rather than dropping the ticker from a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub ticker: String,
    pub short_name: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
}

impl CompanyInfo {
    /// A placeholder record with all metadata fields null.
    pub fn unknown(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            short_name: None,
            industry: None,
            sector: None,
        }
    }
}
