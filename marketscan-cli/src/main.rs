//! MarketScan CLI — scan, movers, and extremes commands.
//!
//! Commands:
//! - `scan` — fetch and augment a ticker universe, export the table and
//!   latest-snapshot CSVs
//! - `movers` — the four top-10 lists for a date (default: latest)
//! - `extremes` — tickers that hit a 52-week low/high on a date

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use marketscan_core::data::{CompanyCache, YahooProvider};
use marketscan_core::movers::{MoverKind, MoversEngine, TopMovers};
use marketscan_core::table::AugmentedTable;
use marketscan_core::universe::{TickerList, Universe};
use marketscan_runner::{
    export_extremes_csv, export_movers_csv, export_snapshot_csv, export_table_csv, run_scan,
};

#[derive(Parser)]
#[command(name = "marketscan", about = "MarketScan CLI — daily equity indicator scanner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and augment a ticker universe, export table and snapshot CSVs.
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Rank the four top-10 mover lists for a date.
    Movers {
        #[command(flatten)]
        scan: ScanArgs,

        /// Query date (YYYY-MM-DD). Defaults to the latest scanned date.
        #[arg(long)]
        date: Option<String>,
    },
    /// List tickers that hit a 52-week low or high on a date.
    Extremes {
        #[command(flatten)]
        scan: ScanArgs,

        /// Query date (YYYY-MM-DD). Defaults to the latest scanned date.
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Ticker list: sp500, sp400, sp600, sp1500, magnificent_seven,
    /// bitcoin, stocks_interest, my_stocks, big_list.
    #[arg(long, default_value = "big_list")]
    list: String,

    /// TOML file with sp500/sp400/sp600 memberships.
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Directory holding stocks_interest.csv and my_stocks.csv.
    #[arg(long, default_value = "data")]
    watchlist_dir: PathBuf,

    /// Start date (YYYY-MM-DD). Defaults to 2 years ago.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<String>,

    /// Company info cache file.
    #[arg(long, default_value = "data/company_info.csv")]
    company_cache: PathBuf,

    /// Output directory for CSV exports.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan { scan } => run_scan_cmd(&scan),
        Commands::Movers { scan, date } => run_movers_cmd(&scan, date.as_deref()),
        Commands::Extremes { scan, date } => run_extremes_cmd(&scan, date.as_deref()),
    }
}

fn run_scan_cmd(args: &ScanArgs) -> Result<()> {
    let table = scan_universe(args)?;
    let mut cache = open_cache(args)?;

    std::fs::create_dir_all(&args.output_dir)?;
    let table_path = args.output_dir.join("augmented_table.csv");
    std::fs::write(&table_path, export_table_csv(&table, &mut cache)?)?;
    let snap_path = args.output_dir.join("latest_snapshot.csv");
    std::fs::write(&snap_path, export_snapshot_csv(&table, &mut cache)?)?;

    println!("Rows:     {}", table.len());
    println!("Table:    {}", table_path.display());
    println!("Snapshot: {}", snap_path.display());
    Ok(())
}

fn run_movers_cmd(args: &ScanArgs, date: Option<&str>) -> Result<()> {
    let table = scan_universe(args)?;
    let date = query_date(&table, date)?;

    let cache = open_cache(args)?;
    let mut engine = MoversEngine::new(&table, cache);
    let movers = engine.top_movers(date)?;

    print_movers(&movers);

    std::fs::create_dir_all(&args.output_dir)?;
    let path = args.output_dir.join(format!("movers_{date}.csv"));
    std::fs::write(&path, export_movers_csv(&movers)?)?;
    println!("Saved: {}", path.display());
    Ok(())
}

fn run_extremes_cmd(args: &ScanArgs, date: Option<&str>) -> Result<()> {
    let table = scan_universe(args)?;
    let date = date.map(parse_date).transpose()?;

    let cache = open_cache(args)?;
    let engine = MoversEngine::new(&table, cache);
    let hits = engine.extremes_on(date)?;

    println!("=== 52-Week Extremes on {} ===", hits.date);
    println!("New lows:  {}", hits.lows.len());
    for hit in &hits.lows {
        println!("  {:<8} close {:>10.2}  low {:>10.2}", hit.symbol, hit.close, hit.extreme);
    }
    println!("New highs: {}", hits.highs.len());
    for hit in &hits.highs {
        println!("  {:<8} close {:>10.2}  high {:>10.2}", hit.symbol, hit.close, hit.extreme);
    }

    std::fs::create_dir_all(&args.output_dir)?;
    let path = args.output_dir.join(format!("extremes_{}.csv", hits.date));
    std::fs::write(&path, export_extremes_csv(&hits)?)?;
    println!("Saved: {}", path.display());
    Ok(())
}

/// Resolve the ticker list and run the parallel scan.
fn scan_universe(args: &ScanArgs) -> Result<AugmentedTable> {
    let list: TickerList = args.list.parse()?;

    let universe = match &args.universe {
        Some(path) => Universe::from_file(path)?,
        None => Universe::builtin(),
    }
    .with_watchlists(
        &args.watchlist_dir.join("stocks_interest.csv"),
        &args.watchlist_dir.join("my_stocks.csv"),
    );

    let tickers = universe.resolve(list);
    if tickers.is_empty() {
        bail!(
            "ticker list '{}' resolved to no tickers (missing --universe file or watchlists?)",
            list.as_str()
        );
    }

    let end = args
        .end
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let start = args
        .start
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| end - chrono::Duration::days(365 * 2));

    let provider = YahooProvider::new();
    let outcome = run_scan(&provider, &tickers, start, end);
    if !outcome.skipped.is_empty() {
        eprintln!("Skipped {} ticker(s): {}", outcome.skipped.len(), outcome.skipped.join(", "));
    }
    if outcome.table.is_empty() {
        bail!("scan produced no rows; all tickers failed to fetch");
    }
    Ok(outcome.table)
}

fn open_cache(args: &ScanArgs) -> Result<CompanyCache<YahooProvider>> {
    if let Some(parent) = args.company_cache.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    CompanyCache::open(&args.company_cache, YahooProvider::new())
        .with_context(|| format!("failed to open {}", args.company_cache.display()))
}

fn query_date(table: &AugmentedTable, date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date(s),
        None => table
            .latest_date()
            .context("the scanned table is empty"),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

fn print_movers(movers: &TopMovers) {
    println!("=== Top Movers on {} ===", movers.date);
    for list in &movers.lists {
        println!();
        println!("--- {} ---", list.kind.label());
        if list.entries.is_empty() {
            println!("  (no rankable rows)");
            continue;
        }
        for (rank, entry) in list.entries.iter().enumerate() {
            let key = match list.kind {
                MoverKind::Risers | MoverKind::Fallers => entry.row.pct_change.unwrap_or(f64::NAN),
                MoverKind::ClosestTo52wLow => entry.row.pct_diff_52w_low,
                MoverKind::ClosestTo52wHigh => entry.row.pct_diff_52w_high,
            };
            println!(
                "{:>3}. {:<8} {:>+8.2}%  {}",
                rank + 1,
                entry.row.symbol,
                key,
                entry.company.short_name.as_deref().unwrap_or("-"),
            );
        }
    }
}
