//! Summary memo — reuse the last aggregation while its inputs are unchanged.
//!
//! The key is the BLAKE3 fingerprint of (strategies, runs, filter). Any change
//! to a record or to the filter changes the key and triggers a full rebuild;
//! a stored summary list is replaced wholesale, never patched.

use tradesage_core::{fingerprint, BacktestRun, DatasetHash, Strategy};

use crate::aggregate::{aggregate_performance, StrategyPerformanceSummary};
use crate::filter::RunFilter;

#[derive(Debug, Default)]
pub struct SummaryMemo {
    key: Option<DatasetHash>,
    summaries: Vec<StrategyPerformanceSummary>,
    rebuilds: usize,
}

impl SummaryMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        strategies: &[Strategy],
        runs: &[BacktestRun],
        filter: RunFilter,
    ) -> &[StrategyPerformanceSummary] {
        let key = match fingerprint(&(strategies, runs, filter)) {
            Ok(key) => Some(key),
            Err(e) => {
                log::warn!("could not fingerprint inputs, recomputing: {e}");
                None
            }
        };

        let fresh = key.is_some() && key == self.key;
        if !fresh {
            self.summaries = aggregate_performance(strategies, runs, filter);
            self.key = key;
            self.rebuilds += 1;
            log::debug!("summary memo rebuilt ({} total)", self.rebuilds);
        }
        &self.summaries
    }

    /// Drop the stored summaries; the next call rebuilds.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.summaries.clear();
    }

    /// Number of full rebuilds so far.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn key(&self) -> Option<&DatasetHash> {
        self.key.as_ref()
    }
}
