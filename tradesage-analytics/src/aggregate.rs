//! Strategy performance aggregation — per-strategy summary statistics over
//! a filtered set of backtest runs.
//!
//! Every summary is rebuilt from scratch on each call; nothing is cached or
//! mutated in place here (see `memo` for the keyed memo used by sessions).
//!
//! Null metrics are read as 0 and stay in the denominator. A strategy whose
//! completed runs never reported a return therefore averages toward 0 rather
//! than being skipped.

use serde::{Deserialize, Serialize};

use tradesage_core::{BacktestRun, Strategy};

use crate::filter::RunFilter;

/// Derived per-strategy statistics. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPerformanceSummary {
    pub strategy: Strategy,
    /// Mean total return, percent.
    pub avg_return: f64,
    /// Mean win rate, percent (0–100).
    pub avg_win_rate: f64,
    /// Mean max drawdown, percent.
    pub avg_drawdown: f64,
    pub total_trades: u64,
    pub backtest_count: usize,
    /// 0–100; 100 when every run returned the same.
    pub consistency: f64,
    pub risk_adjusted_return: f64,
    pub best_return: f64,
    pub worst_return: f64,
}

/// Summarize every strategy that has at least one run passing `filter`.
///
/// Output follows the order of `strategies`. Strategies with no qualifying
/// runs are omitted. An empty result is the normal "no data" outcome.
pub fn aggregate_performance(
    strategies: &[Strategy],
    runs: &[BacktestRun],
    filter: RunFilter,
) -> Vec<StrategyPerformanceSummary> {
    let filtered = filter.apply(runs);

    let summaries: Vec<StrategyPerformanceSummary> = strategies
        .iter()
        .filter_map(|strategy| {
            let strategy_runs: Vec<&BacktestRun> = filtered
                .iter()
                .copied()
                .filter(|r| r.strategy_id == strategy.id)
                .collect();
            summarize_strategy(strategy, &strategy_runs)
        })
        .collect();

    log::debug!(
        "aggregated {} of {} strategies from {} runs ({} pass filter '{}')",
        summaries.len(),
        strategies.len(),
        runs.len(),
        filtered.len(),
        filter
    );
    summaries
}

/// Reduce one strategy's already-filtered runs. `None` when `runs` is empty.
pub fn summarize_strategy(
    strategy: &Strategy,
    runs: &[&BacktestRun],
) -> Option<StrategyPerformanceSummary> {
    if runs.is_empty() {
        return None;
    }

    let returns: Vec<f64> = runs.iter().map(|r| r.return_or_zero()).collect();
    let win_rates: Vec<f64> = runs.iter().map(|r| r.win_rate_or_zero()).collect();
    let drawdowns: Vec<f64> = runs.iter().map(|r| r.drawdown_or_zero()).collect();

    let avg_return = mean(&returns);
    let avg_drawdown = mean(&drawdowns);

    Some(StrategyPerformanceSummary {
        strategy: strategy.clone(),
        avg_return,
        avg_win_rate: mean(&win_rates) * 100.0,
        avg_drawdown,
        total_trades: runs.iter().map(|r| r.trades_or_zero()).sum(),
        backtest_count: runs.len(),
        consistency: consistency_score(&returns, avg_return),
        risk_adjusted_return: risk_adjusted_return(avg_return, avg_drawdown),
        best_return: returns.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        worst_return: returns.iter().copied().fold(f64::INFINITY, f64::min),
    })
}

// ─── Individual reductions ──────────────────────────────────────────

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (denominator = n) around a precomputed mean.
pub fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Consistency score: `max(0, 100 − σ)` with σ the population standard
/// deviation of returns. Clamped to [0, 100].
pub fn consistency_score(returns: &[f64], avg_return: f64) -> f64 {
    let std_dev = population_variance(returns, avg_return).sqrt();
    (100.0 - std_dev).max(0.0)
}

/// Calmar-like ratio: average return over average drawdown.
///
/// Falls back to the raw average return when the average drawdown is not
/// positive, so the result is finite for finite inputs.
pub fn risk_adjusted_return(avg_return: f64, avg_drawdown: f64) -> f64 {
    if avg_drawdown > 0.0 {
        avg_return / avg_drawdown
    } else {
        avg_return
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tradesage_core::{RunId, RunStatus, StrategyId, StrategyType};

    fn strategy(id: &str) -> Strategy {
        Strategy::new(id, format!("Strategy {id}"), StrategyType::TrendFollowing)
    }

    fn run(
        id: &str,
        strategy_id: &str,
        status: RunStatus,
        ret: Option<f64>,
        win_rate: Option<f64>,
        dd: Option<f64>,
        trades: Option<u64>,
    ) -> BacktestRun {
        BacktestRun {
            id: RunId::new(id),
            strategy_id: StrategyId::new(strategy_id),
            status,
            total_return_percent: ret,
            win_rate,
            max_drawdown_percent: dd,
            total_trades: trades,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    fn completed(id: &str, sid: &str, ret: f64, wr: f64, dd: f64, trades: u64) -> BacktestRun {
        run(id, sid, RunStatus::Completed, Some(ret), Some(wr), Some(dd), Some(trades))
    }

    #[test]
    fn identical_runs_give_full_consistency() {
        let strategies = vec![strategy("S1"), strategy("S2")];
        let runs = vec![
            completed("r1", "S1", 10.0, 0.6, 5.0, 20),
            completed("r2", "S1", 10.0, 0.6, 5.0, 20),
        ];
        let out = aggregate_performance(&strategies, &runs, RunFilter::Completed);

        assert_eq!(out.len(), 1);
        let s1 = &out[0];
        assert_eq!(s1.strategy.id, StrategyId::new("S1"));
        assert_eq!(s1.avg_return, 10.0);
        assert_eq!(s1.consistency, 100.0);
        assert_eq!(s1.risk_adjusted_return, 2.0);
        assert_eq!(s1.backtest_count, 2);
        assert_eq!(s1.total_trades, 40);
        assert!((s1.avg_win_rate - 60.0).abs() < 1e-9);
        assert_eq!(s1.best_return, 10.0);
        assert_eq!(s1.worst_return, 10.0);
    }

    #[test]
    fn nulls_count_as_zero_in_denominator() {
        let strategies = vec![strategy("S1")];
        let runs = vec![
            completed("r1", "S1", 12.0, 0.5, 6.0, 10),
            run("r2", "S1", RunStatus::Completed, None, None, None, None),
        ];
        let out = aggregate_performance(&strategies, &runs, RunFilter::Completed);
        let s = &out[0];
        assert_eq!(s.avg_return, 6.0);
        assert_eq!(s.avg_win_rate, 25.0);
        assert_eq!(s.avg_drawdown, 3.0);
        assert_eq!(s.total_trades, 10);
        assert_eq!(s.worst_return, 0.0);
        assert_eq!(s.best_return, 12.0);
        // σ of [12, 0] around 6 is 6
        assert!((s.consistency - 94.0).abs() < 1e-9);
        assert_eq!(s.risk_adjusted_return, 2.0);
    }

    #[test]
    fn strategies_without_runs_are_omitted_and_order_is_kept() {
        let strategies = vec![strategy("S3"), strategy("S1"), strategy("S2")];
        let runs = vec![
            completed("r1", "S1", 1.0, 0.5, 1.0, 1),
            completed("r2", "S3", 30.0, 0.5, 1.0, 1),
            run("r3", "S2", RunStatus::Failed, Some(50.0), None, None, None),
        ];
        let out = aggregate_performance(&strategies, &runs, RunFilter::All);
        let ids: Vec<&str> = out.iter().map(|s| s.strategy.id.as_str()).collect();
        assert_eq!(ids, vec!["S3", "S1"]);
    }

    #[test]
    fn profitable_filter_drops_losing_runs() {
        let strategies = vec![strategy("S1"), strategy("S2")];
        let runs = vec![
            completed("r1", "S1", 8.0, 0.5, 4.0, 5),
            completed("r2", "S1", -3.0, 0.3, 9.0, 5),
            completed("r3", "S2", -1.0, 0.4, 2.0, 5),
        ];
        let out = aggregate_performance(&strategies, &runs, RunFilter::Profitable);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].backtest_count, 1);
        assert_eq!(out[0].avg_return, 8.0);
    }

    #[test]
    fn zero_drawdown_falls_back_to_return() {
        let strategies = vec![strategy("S1")];
        let runs = vec![completed("r1", "S1", 7.5, 1.0, 0.0, 3)];
        let out = aggregate_performance(&strategies, &runs, RunFilter::Completed);
        assert_eq!(out[0].risk_adjusted_return, 7.5);
    }

    #[test]
    fn wide_dispersion_clamps_consistency_at_zero() {
        let strategies = vec![strategy("S1")];
        let runs = vec![
            completed("r1", "S1", 300.0, 0.5, 10.0, 1),
            completed("r2", "S1", -300.0, 0.5, 10.0, 1),
        ];
        let out = aggregate_performance(&strategies, &runs, RunFilter::Completed);
        assert_eq!(out[0].consistency, 0.0);
    }

    #[test]
    fn empty_inputs_yield_empty_output() {
        assert!(aggregate_performance(&[], &[], RunFilter::All).is_empty());
        let strategies = vec![strategy("S1")];
        assert!(aggregate_performance(&strategies, &[], RunFilter::Completed).is_empty());
    }

    #[test]
    fn summarize_empty_is_none() {
        assert!(summarize_strategy(&strategy("S1"), &[]).is_none());
    }

    #[test]
    fn reductions() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(population_variance(&[1.0, 3.0], 2.0), 1.0);
        assert_eq!(consistency_score(&[5.0, 5.0, 5.0], 5.0), 100.0);
        assert_eq!(risk_adjusted_return(-4.0, 2.0), -2.0);
        assert_eq!(risk_adjusted_return(-4.0, -1.0), -4.0);
    }
}
