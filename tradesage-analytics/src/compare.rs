//! Strategy comparison — rank a chosen subset of summaries by risk-adjusted return.
//!
//! Comparing needs at least two distinct strategies. With fewer, the operation
//! does nothing and returns `None`; callers treat this as "nothing to show",
//! not as an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use tradesage_core::StrategyId;

use crate::aggregate::StrategyPerformanceSummary;

/// Minimum number of distinct strategies a comparison needs.
pub const MIN_COMPARISON: usize = 2;

/// A summary annotated with its 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStrategy {
    pub rank: usize,
    pub summary: StrategyPerformanceSummary,
}

/// Rank the selected strategies by descending risk-adjusted return.
///
/// Selected ids without a summary (no qualifying runs under the active
/// filter) are skipped. Ties keep the order of `summaries`.
pub fn compare_strategies(
    summaries: &[StrategyPerformanceSummary],
    selected: &[StrategyId],
) -> Option<Vec<RankedStrategy>> {
    let wanted: HashSet<&StrategyId> = selected.iter().collect();
    if wanted.len() < MIN_COMPARISON {
        log::debug!(
            "comparison skipped: {} distinct strategies selected, need {MIN_COMPARISON}",
            wanted.len()
        );
        return None;
    }

    let chosen: Vec<&StrategyPerformanceSummary> = summaries
        .iter()
        .filter(|s| wanted.contains(&s.strategy.id))
        .collect();
    Some(rank(chosen))
}

/// Rank every summary by descending risk-adjusted return (leaderboard order).
pub fn rank_all(summaries: &[StrategyPerformanceSummary]) -> Vec<RankedStrategy> {
    rank(summaries.iter().collect())
}

fn rank(mut chosen: Vec<&StrategyPerformanceSummary>) -> Vec<RankedStrategy> {
    // sort_by is stable, so ties stay in aggregator order.
    chosen.sort_by(|a, b| {
        b.risk_adjusted_return
            .partial_cmp(&a.risk_adjusted_return)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    chosen
        .into_iter()
        .enumerate()
        .map(|(i, summary)| RankedStrategy {
            rank: i + 1,
            summary: summary.clone(),
        })
        .collect()
}
