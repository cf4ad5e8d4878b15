//! MarketScan Runner — scan orchestration and export.
//!
//! This crate builds on `marketscan-core` to provide:
//! - The parallel per-ticker scan pipeline (fetch → augment → merge)
//! - CSV export of the augmented table, the latest snapshot, the
//!   combined mover lists, and the extremes report

pub mod export;
pub mod pipeline;

pub use export::{
    export_extremes_csv, export_movers_csv, export_snapshot_csv, export_table_csv,
};
pub use pipeline::{run_scan, ScanOutcome};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn scan_outcome_is_send_sync() {
        assert_send::<ScanOutcome>();
        assert_sync::<ScanOutcome>();
    }
}
