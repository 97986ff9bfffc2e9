//! TradeSage Analytics — strategy performance aggregation, grades, rankings,
//! journal statistics and insights.
//!
//! This crate builds on `tradesage-core` to provide:
//! - Run filtering and per-strategy performance summaries
//! - A–F grades for completed backtests
//! - Strategy comparison and leaderboard ranking
//! - Sorting, run queries and pagination for list views
//! - Trade journal statistics with a per-emotion breakdown
//! - Pluggable insight providers
//! - A fingerprint-keyed summary memo and the `JournalSession` context object
//! - CSV / JSON / Markdown / text export and TOML configuration

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod export;
pub mod filter;
pub mod grade;
pub mod insights;
pub mod journal;
pub mod listing;
pub mod memo;
pub mod session;

pub use aggregate::{aggregate_performance, StrategyPerformanceSummary};
pub use compare::{compare_strategies, rank_all, RankedStrategy, MIN_COMPARISON};
pub use config::{ConfigError, JournalConfig, ProviderKind};
pub use export::{render_grades, render_ranking, render_summaries, ExportError, ExportFormat};
pub use filter::RunFilter;
pub use grade::{grade_metrics, grade_run, grade_runs, GradeBreakdown, GradedRun, StrategyGrade};
pub use insights::{
    Insight, InsightContext, InsightKind, InsightProvider, InsightThresholds,
    RuleBasedInsightProvider, StaticInsightProvider,
};
pub use journal::{EmotionStats, TradeStatistics};
pub use listing::{
    paginate, query_runs, sort_summaries, Page, RunQuery, RunSortKey, SortDirection, SortKey,
};
pub use memo::SummaryMemo;
pub use session::JournalSession;
