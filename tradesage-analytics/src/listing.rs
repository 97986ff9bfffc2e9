//! List-view logic — sorting, run queries and pagination.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tradesage_core::{BacktestRun, RunStatus, Strategy, StrategyId};

use crate::aggregate::StrategyPerformanceSummary;

/// Which summary column to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    AvgReturn,
    AvgWinRate,
    AvgDrawdown,
    TotalTrades,
    BacktestCount,
    Consistency,
    #[default]
    RiskAdjustedReturn,
    BestReturn,
    WorstReturn,
}

impl SortKey {
    fn value(&self, s: &StrategyPerformanceSummary) -> f64 {
        match self {
            Self::Name => 0.0,
            Self::AvgReturn => s.avg_return,
            Self::AvgWinRate => s.avg_win_rate,
            Self::AvgDrawdown => s.avg_drawdown,
            Self::TotalTrades => s.total_trades as f64,
            Self::BacktestCount => s.backtest_count as f64,
            Self::Consistency => s.consistency,
            Self::RiskAdjustedReturn => s.risk_adjusted_return,
            Self::BestReturn => s.best_return,
            Self::WorstReturn => s.worst_return,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "name" => Self::Name,
            "avg_return" | "return" => Self::AvgReturn,
            "avg_win_rate" | "win_rate" => Self::AvgWinRate,
            "avg_drawdown" | "drawdown" => Self::AvgDrawdown,
            "total_trades" | "trades" => Self::TotalTrades,
            "backtest_count" | "runs" => Self::BacktestCount,
            "consistency" => Self::Consistency,
            "risk_adjusted_return" | "risk_adjusted" => Self::RiskAdjustedReturn,
            "best_return" | "best" => Self::BestReturn,
            "worst_return" | "worst" => Self::WorstReturn,
            other => return Err(format!("unknown sort key '{other}'")),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            other => Err(format!(
                "unknown sort direction '{other}' (expected ascending or descending)"
            )),
        }
    }
}

/// Stable in-place sort. Incomparable values (NaN) compare as equal.
pub fn sort_summaries(
    summaries: &mut [StrategyPerformanceSummary],
    key: SortKey,
    direction: SortDirection,
) {
    summaries.sort_by(|a, b| {
        let ord = match key {
            SortKey::Name => a
                .strategy
                .name
                .to_lowercase()
                .cmp(&b.strategy.name.to_lowercase()),
            _ => key
                .value(a)
                .partial_cmp(&key.value(b))
                .unwrap_or(Ordering::Equal),
        };
        direction.apply(ord)
    });
}

// ─── Run queries ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunSortKey {
    #[default]
    CreatedAt,
    TotalReturn,
    WinRate,
    MaxDrawdown,
    TotalTrades,
}

/// Filters and ordering for the backtest run table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunQuery {
    pub status: Option<RunStatus>,
    pub strategy_id: Option<StrategyId>,
    /// Case-insensitive substring over run id and strategy name.
    pub search: Option<String>,
    pub sort: RunSortKey,
    pub direction: SortDirection,
}

/// Apply a run query. Defaults to newest first.
pub fn query_runs<'a>(
    runs: &'a [BacktestRun],
    strategies: &[Strategy],
    query: &RunQuery,
) -> Vec<&'a BacktestRun> {
    let names: HashMap<&StrategyId, &str> = strategies
        .iter()
        .map(|s| (&s.id, s.name.as_str()))
        .collect();
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<&BacktestRun> = runs
        .iter()
        .filter(|r| query.status.map_or(true, |s| r.status == s))
        .filter(|r| query.strategy_id.as_ref().map_or(true, |id| &r.strategy_id == id))
        .filter(|r| match &needle {
            None => true,
            Some(n) => {
                r.id.as_str().to_lowercase().contains(n.as_str())
                    || names
                        .get(&r.strategy_id)
                        .is_some_and(|name| name.to_lowercase().contains(n.as_str()))
            }
        })
        .collect();

    matched.sort_by(|a, b| {
        let ord = match query.sort {
            RunSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            RunSortKey::TotalReturn => cmp_f64(a.return_or_zero(), b.return_or_zero()),
            RunSortKey::WinRate => cmp_f64(a.win_rate_or_zero(), b.win_rate_or_zero()),
            RunSortKey::MaxDrawdown => cmp_f64(a.drawdown_or_zero(), b.drawdown_or_zero()),
            RunSortKey::TotalTrades => a.trades_or_zero().cmp(&b.trades_or_zero()),
        };
        query.direction.apply(ord)
    });
    matched
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// ─── Pagination ─────────────────────────────────────────────────────

/// One page of a list plus the totals a pager needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}

/// Slice out page `page` (1-based). Zero page or page size are clamped to 1;
/// a page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);
    Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tradesage_core::{RunId, StrategyType};

    fn summary(name: &str, ret: f64, trades: u64) -> StrategyPerformanceSummary {
        StrategyPerformanceSummary {
            strategy: Strategy::new(name, name, StrategyType::Momentum),
            avg_return: ret,
            avg_win_rate: 50.0,
            avg_drawdown: 2.0,
            total_trades: trades,
            backtest_count: 1,
            consistency: 90.0,
            risk_adjusted_return: ret / 2.0,
            best_return: ret,
            worst_return: ret,
        }
    }

    fn names(s: &[StrategyPerformanceSummary]) -> Vec<&str> {
        s.iter().map(|x| x.strategy.name.as_str()).collect()
    }

    #[test]
    fn sort_by_return_both_directions() {
        let mut s = vec![summary("a", 1.0, 5), summary("b", 3.0, 1), summary("c", 2.0, 9)];
        sort_summaries(&mut s, SortKey::AvgReturn, SortDirection::Descending);
        assert_eq!(names(&s), vec!["b", "c", "a"]);
        sort_summaries(&mut s, SortKey::AvgReturn, SortDirection::Ascending);
        assert_eq!(names(&s), vec!["a", "c", "b"]);
    }

    #[test]
    fn sort_by_name_is_case_insensitive() {
        let mut s = vec![summary("beta", 1.0, 1), summary("Alpha", 1.0, 1), summary("gamma", 1.0, 1)];
        sort_summaries(&mut s, SortKey::Name, SortDirection::Ascending);
        assert_eq!(names(&s), vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn sort_with_nan_does_not_panic() {
        let mut s = vec![summary("a", f64::NAN, 1), summary("b", 1.0, 1)];
        sort_summaries(&mut s, SortKey::AvgReturn, SortDirection::Descending);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn sort_direction_parsing() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!("ascending".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("risk-adjusted".parse::<SortKey>().unwrap(), SortKey::RiskAdjustedReturn);
        assert_eq!("Trades".parse::<SortKey>().unwrap(), SortKey::TotalTrades);
        assert!("sharpe".parse::<SortKey>().is_err());
    }

    fn run(id: &str, sid: &str, status: RunStatus, day: u32, ret: f64) -> BacktestRun {
        BacktestRun {
            id: RunId::new(id),
            strategy_id: StrategyId::new(sid),
            status,
            total_return_percent: Some(ret),
            win_rate: None,
            max_drawdown_percent: None,
            total_trades: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    fn run_ids(runs: Vec<&BacktestRun>) -> Vec<&str> {
        runs.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn run_query_defaults_newest_first() {
        let runs = vec![
            run("r1", "s1", RunStatus::Completed, 1, 1.0),
            run("r2", "s1", RunStatus::Failed, 3, 2.0),
            run("r3", "s2", RunStatus::Completed, 2, 3.0),
        ];
        let out = query_runs(&runs, &[], &RunQuery::default());
        assert_eq!(run_ids(out), vec!["r2", "r3", "r1"]);
    }

    #[test]
    fn run_query_filters_and_searches() {
        let strategies = vec![
            Strategy::new("s1", "Opening Range Breakout", StrategyType::Breakout),
            Strategy::new("s2", "VWAP Revert", StrategyType::MeanReversion),
        ];
        let runs = vec![
            run("r1", "s1", RunStatus::Completed, 1, 1.0),
            run("r2", "s1", RunStatus::Failed, 3, 2.0),
            run("r3", "s2", RunStatus::Completed, 2, 3.0),
        ];

        let by_status = RunQuery {
            status: Some(RunStatus::Completed),
            sort: RunSortKey::TotalReturn,
            ..Default::default()
        };
        assert_eq!(run_ids(query_runs(&runs, &strategies, &by_status)), vec!["r3", "r1"]);

        let by_search = RunQuery {
            search: Some("  vwap ".into()),
            ..Default::default()
        };
        assert_eq!(run_ids(query_runs(&runs, &strategies, &by_search)), vec!["r3"]);

        let by_strategy = RunQuery {
            strategy_id: Some(StrategyId::new("s1")),
            direction: SortDirection::Ascending,
            ..Default::default()
        };
        assert_eq!(run_ids(query_runs(&runs, &strategies, &by_strategy)), vec!["r1", "r2"]);
    }

    #[test]
    fn paginate_basic() {
        let items: Vec<u32> = (1..=7).collect();
        let p1 = paginate(&items, 1, 3);
        assert_eq!(p1.items, vec![1, 2, 3]);
        assert_eq!(p1.total_pages, 3);
        assert!(p1.has_next());
        assert!(!p1.has_previous());

        let p3 = paginate(&items, 3, 3);
        assert_eq!(p3.items, vec![7]);
        assert!(!p3.has_next());
        assert!(p3.has_previous());
    }

    #[test]
    fn paginate_edges() {
        let items: Vec<u32> = (1..=4).collect();
        assert!(paginate(&items, 9, 2).items.is_empty());
        let clamped = paginate(&items, 0, 0);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, 1);
        assert_eq!(clamped.items, vec![1]);

        let empty: Vec<u32> = vec![];
        let p = paginate(&empty, 1, 10);
        assert_eq!(p.total_pages, 0);
        assert!(p.items.is_empty());
        assert!(!p.has_next());
        assert!(!p.has_previous());
    }
}
