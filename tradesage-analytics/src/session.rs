//! Journal session — the explicit context object handed to front ends.
//!
//! Owns the loaded records, the summary memo and the injected insight
//! provider. Front ends receive a session instead of reaching for globals.

use tradesage_core::{BacktestRun, Strategy, StrategyId, Trade};

use crate::aggregate::StrategyPerformanceSummary;
use crate::compare::{compare_strategies, rank_all, RankedStrategy};
use crate::filter::RunFilter;
use crate::grade::{grade_runs, GradedRun};
use crate::insights::{Insight, InsightContext, InsightProvider};
use crate::journal::TradeStatistics;
use crate::memo::SummaryMemo;

pub struct JournalSession {
    strategies: Vec<Strategy>,
    runs: Vec<BacktestRun>,
    trades: Vec<Trade>,
    provider: Box<dyn InsightProvider>,
    memo: SummaryMemo,
}

impl JournalSession {
    pub fn new(
        strategies: Vec<Strategy>,
        runs: Vec<BacktestRun>,
        trades: Vec<Trade>,
        provider: Box<dyn InsightProvider>,
    ) -> Self {
        Self {
            strategies,
            runs,
            trades,
            provider,
            memo: SummaryMemo::new(),
        }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn runs(&self) -> &[BacktestRun] {
        &self.runs
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn replace_runs(&mut self, runs: Vec<BacktestRun>) {
        self.runs = runs;
    }

    pub fn replace_strategies(&mut self, strategies: Vec<Strategy>) {
        self.strategies = strategies;
    }

    pub fn replace_trades(&mut self, trades: Vec<Trade>) {
        self.trades = trades;
    }

    /// Swap the insight provider, e.g. from the static list to a real model.
    pub fn set_provider(&mut self, provider: Box<dyn InsightProvider>) {
        self.provider = provider;
    }

    pub fn summaries(&mut self, filter: RunFilter) -> &[StrategyPerformanceSummary] {
        self.memo.get_or_compute(&self.strategies, &self.runs, filter)
    }

    /// `None` when fewer than two distinct strategies are selected.
    pub fn compare(
        &mut self,
        selected: &[StrategyId],
        filter: RunFilter,
    ) -> Option<Vec<RankedStrategy>> {
        compare_strategies(self.summaries(filter), selected)
    }

    pub fn leaderboard(&mut self, filter: RunFilter) -> Vec<RankedStrategy> {
        rank_all(self.summaries(filter))
    }

    pub fn grades(&self) -> Vec<GradedRun> {
        grade_runs(&self.runs)
    }

    pub fn trade_statistics(&self) -> TradeStatistics {
        TradeStatistics::compute(&self.trades)
    }

    pub fn insights(&mut self, filter: RunFilter) -> Vec<Insight> {
        let stats = (!self.trades.is_empty()).then(|| TradeStatistics::compute(&self.trades));
        let summaries = self.memo.get_or_compute(&self.strategies, &self.runs, filter);
        let context = InsightContext {
            summaries,
            trade_stats: stats.as_ref(),
        };
        self.provider.generate(&context)
    }

    pub fn memo_rebuilds(&self) -> usize {
        self.memo.rebuilds()
    }
}
