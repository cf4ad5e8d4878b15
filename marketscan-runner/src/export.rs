//! CSV export of scan outputs.
//!
//! Every sink shares one flat record layout: the bar columns, the
//! derived indicator columns, then the company columns (Symbol, Short
//! Name, Sector, Industry). Mover exports append a final List label
//! column. Null fields serialize as empty cells. Writers build the
//! whole document in memory, so nothing is written on failure.

use anyhow::{Context, Result};
use tracing::warn;

use marketscan_core::domain::{CompanyInfo, IndicatorRow};
use marketscan_core::movers::{CompanySource, ExtremeHits, TopMovers};
use marketscan_core::table::AugmentedTable;

const BASE_COLUMNS: [&str; 40] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "EMA_12",
    "EMA_26",
    "MACD_Line",
    "MACD_Signal",
    "MACD_Histogram",
    "5_Day_MA",
    "50_Day_MA",
    "250_Day_MA",
    "5_Day_Volume_MA",
    "50_Day_Volume_MA",
    "250_Day_Volume_MA",
    "Daily_Volume_%_Change",
    "3_Month_Low",
    "3_Month_High",
    "1_Month_Low",
    "1_Month_High",
    "5_Years_Low",
    "5_Years_High",
    "Percent_Diff_3M_Low",
    "Percent_Diff_3M_High",
    "52_Week_Low",
    "52_Week_High",
    "Percent_Diff_From_52_Week_Low",
    "Percent_Diff_From_52_Week_High",
    "Hit_52_Week_Low",
    "Hit_52_Week_High",
    "Percent_Change",
    "5_Day_Slope",
    "5_Day_R_Squared",
    "5_Day_P_Value",
    "Symbol",
    "Short Name",
    "Sector",
    "Industry",
];

/// Export the full augmented table, one record per (ticker, date) row.
pub fn export_table_csv<C: CompanySource>(
    table: &AugmentedTable,
    companies: &mut C,
) -> Result<String> {
    export_rows(table.rows().iter(), companies)
}

/// Export the latest-snapshot view: one record per ticker, maximum date.
pub fn export_snapshot_csv<C: CompanySource>(
    table: &AugmentedTable,
    companies: &mut C,
) -> Result<String> {
    export_rows(table.latest_snapshot().into_iter(), companies)
}

fn export_rows<'r, C: CompanySource>(
    rows: impl Iterator<Item = &'r IndicatorRow>,
    companies: &mut C,
) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(BASE_COLUMNS)?;
    for row in rows {
        let company = lookup(companies, &row.symbol);
        wtr.write_record(record_for(row, &company, None))?;
    }
    finish(wtr)
}

/// Export the four mover lists as one document with a trailing List
/// label column. Lists appear in engine order; entries keep their rank
/// order.
pub fn export_movers_csv(movers: &TopMovers) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
    header.push("List");
    wtr.write_record(header)?;
    for list in &movers.lists {
        for entry in &list.entries {
            wtr.write_record(record_for(
                &entry.row,
                &entry.company,
                Some(list.kind.label()),
            ))?;
        }
    }
    finish(wtr)
}

/// Export the 52-week extreme hits for one date: lows first, then highs.
pub fn export_extremes_csv(hits: &ExtremeHits) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Date", "Symbol", "Close", "52_Week_Extreme", "Side"])?;
    for (side, set) in [("Low", &hits.lows), ("High", &hits.highs)] {
        for hit in set {
            wtr.write_record([
                hits.date.to_string(),
                hit.symbol.clone(),
                hit.close.to_string(),
                hit.extreme.to_string(),
                side.to_string(),
            ])?;
        }
    }
    finish(wtr)
}

fn lookup<C: CompanySource>(companies: &mut C, ticker: &str) -> CompanyInfo {
    match companies.company_info(ticker) {
        Ok(info) => info,
        Err(e) => {
            warn!(ticker, error = %e, "company info fetch failed; exporting null fields");
            CompanyInfo::unknown(ticker)
        }
    }
}

fn record_for(row: &IndicatorRow, company: &CompanyInfo, list: Option<&str>) -> Vec<String> {
    let mut rec = vec![
        row.date.to_string(),
        row.open.to_string(),
        row.high.to_string(),
        row.low.to_string(),
        row.close.to_string(),
        row.volume.to_string(),
        row.ema_12.to_string(),
        row.ema_26.to_string(),
        row.macd_line.to_string(),
        row.macd_signal.to_string(),
        row.macd_histogram.to_string(),
        opt(row.ma_5),
        opt(row.ma_50),
        opt(row.ma_250),
        opt(row.volume_ma_5),
        opt(row.volume_ma_50),
        opt(row.volume_ma_250),
        opt(row.daily_volume_pct_change),
        row.low_3m.to_string(),
        row.high_3m.to_string(),
        row.low_1m.to_string(),
        row.high_1m.to_string(),
        row.low_5y.to_string(),
        row.high_5y.to_string(),
        row.pct_diff_3m_low.to_string(),
        row.pct_diff_3m_high.to_string(),
        row.low_52w.to_string(),
        row.high_52w.to_string(),
        row.pct_diff_52w_low.to_string(),
        row.pct_diff_52w_high.to_string(),
        row.hit_52w_low.to_string(),
        row.hit_52w_high.to_string(),
        opt(row.pct_change),
        opt(row.slope_5d),
        opt(row.r_squared_5d),
        opt(row.p_value_5d),
        company.ticker.clone(),
        company.short_name.clone().unwrap_or_default(),
        company.sector.clone().unwrap_or_default(),
        company.industry.clone().unwrap_or_default(),
    ];
    if let Some(label) = list {
        rec.push(label.to_string());
    }
    rec
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
