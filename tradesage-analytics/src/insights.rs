//! Insight providers — the seam behind the assistant's insight cards.
//!
//! Callers depend only on [`InsightProvider`]. The static provider reproduces
//! the fixed card list; the rule-based provider derives cards from aggregated
//! numbers. A model-backed provider can be swapped in without touching callers.

use serde::{Deserialize, Serialize};

use tradesage_core::StrategyId;

use crate::aggregate::StrategyPerformanceSummary;
use crate::journal::TradeStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Strength,
    Warning,
    Suggestion,
    Info,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Strength => "strength",
            InsightKind::Warning => "warning",
            InsightKind::Suggestion => "suggestion",
            InsightKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub strategy_id: Option<StrategyId>,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            strategy_id: None,
        }
    }

    pub fn for_strategy(mut self, id: &StrategyId) -> Self {
        self.strategy_id = Some(id.clone());
        self
    }
}

/// Everything a provider may look at.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightContext<'a> {
    pub summaries: &'a [StrategyPerformanceSummary],
    pub trade_stats: Option<&'a TradeStatistics>,
}

pub trait InsightProvider: Send + Sync {
    fn generate(&self, context: &InsightContext<'_>) -> Vec<Insight>;
}

// ─── Static provider ────────────────────────────────────────────────

/// Returns the same list regardless of context.
#[derive(Debug, Clone)]
pub struct StaticInsightProvider {
    insights: Vec<Insight>,
}

impl StaticInsightProvider {
    pub fn new(insights: Vec<Insight>) -> Self {
        Self { insights }
    }
}

impl Default for StaticInsightProvider {
    fn default() -> Self {
        Self::new(vec![
            Insight::new(
                InsightKind::Strength,
                "Strong morning sessions",
                "Your win rate is highest in the first trading hour. Consider concentrating size there.",
            ),
            Insight::new(
                InsightKind::Warning,
                "Overtrading after losses",
                "Trade frequency rises after two consecutive losses. A cooldown rule may help.",
            ),
            Insight::new(
                InsightKind::Suggestion,
                "Tighten stop placement",
                "Average loss exceeds average win. Review stop distance against recent volatility.",
            ),
        ])
    }
}

impl InsightProvider for StaticInsightProvider {
    fn generate(&self, _context: &InsightContext<'_>) -> Vec<Insight> {
        self.insights.clone()
    }
}

// ─── Rule-based provider ────────────────────────────────────────────

/// Thresholds for the rule-based provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    /// Consistency below this is flagged.
    pub min_consistency: f64,
    /// Average drawdown (percent) above this is flagged.
    pub max_drawdown: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            min_consistency: 70.0,
            max_drawdown: 15.0,
        }
    }
}

/// Derives insights from summaries and journal statistics.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedInsightProvider {
    thresholds: InsightThresholds,
}

impl RuleBasedInsightProvider {
    pub fn new(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }
}

impl InsightProvider for RuleBasedInsightProvider {
    fn generate(&self, context: &InsightContext<'_>) -> Vec<Insight> {
        let mut out = Vec::new();

        let best = context.summaries.iter().max_by(|a, b| {
            a.risk_adjusted_return
                .partial_cmp(&b.risk_adjusted_return)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(best) = best.filter(|b| b.avg_return > 0.0) {
            out.push(
                Insight::new(
                    InsightKind::Strength,
                    format!("{} leads on risk-adjusted return", best.strategy.name),
                    format!(
                        "Risk-adjusted return {:.2} across {} backtests (avg return {:.2}%, avg drawdown {:.2}%).",
                        best.risk_adjusted_return,
                        best.backtest_count,
                        best.avg_return,
                        best.avg_drawdown
                    ),
                )
                .for_strategy(&best.strategy.id),
            );
        }

        for s in context.summaries {
            if s.backtest_count > 1 && s.consistency < self.thresholds.min_consistency {
                out.push(
                    Insight::new(
                        InsightKind::Warning,
                        format!("{} results are inconsistent", s.strategy.name),
                        format!(
                            "Consistency {:.1} is below {:.1}; returns range from {:.2}% to {:.2}%.",
                            s.consistency, self.thresholds.min_consistency, s.worst_return, s.best_return
                        ),
                    )
                    .for_strategy(&s.strategy.id),
                );
            }
            if s.avg_drawdown > self.thresholds.max_drawdown {
                out.push(
                    Insight::new(
                        InsightKind::Warning,
                        format!("{} draws down heavily", s.strategy.name),
                        format!(
                            "Average max drawdown {:.2}% exceeds {:.2}%. Review position sizing.",
                            s.avg_drawdown, self.thresholds.max_drawdown
                        ),
                    )
                    .for_strategy(&s.strategy.id),
                );
            }
            if s.avg_win_rate < 50.0 && s.avg_return > 0.0 {
                out.push(
                    Insight::new(
                        InsightKind::Info,
                        format!("{} wins by payoff, not hit rate", s.strategy.name),
                        format!(
                            "Win rate {:.1}% with positive average return {:.2}%: winners are larger than losers.",
                            s.avg_win_rate, s.avg_return
                        ),
                    )
                    .for_strategy(&s.strategy.id),
                );
            }
        }

        if let Some(worst) = context.trade_stats.and_then(|t| t.worst_emotion()) {
            if worst.avg_pnl < 0.0 {
                out.push(Insight::new(
                    InsightKind::Suggestion,
                    format!("Trades tagged '{}' lose money", worst.emotion.as_str()),
                    format!(
                        "{} trades averaged {:.2} P&L with a {:.1}% win rate. Consider sitting out when you feel {}.",
                        worst.trade_count,
                        worst.avg_pnl,
                        worst.win_rate,
                        worst.emotion.as_str()
                    ),
                ));
            }
        }

        log::debug!("rule-based provider produced {} insights", out.len());
        out
    }
}
