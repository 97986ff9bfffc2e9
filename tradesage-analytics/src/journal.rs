//! Trade journal statistics — dashboard numbers over journaled trades.
//!
//! Only closed trades count toward performance figures. Open trades are
//! reported as a count and otherwise ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tradesage_core::{Emotion, Trade};

/// Aggregate performance over closed journal trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStatistics {
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,
    /// Percent of closed trades with positive P&L.
    pub win_rate: f64,
    pub gross_profit: f64,
    /// Absolute value of summed losses.
    pub gross_loss: f64,
    pub net_pnl: f64,
    /// `None` when there are no losses to divide by.
    pub profit_factor: Option<f64>,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Net P&L per closed trade.
    pub expectancy: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub by_emotion: Vec<EmotionStats>,
}

/// How trades tagged with one emotion performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionStats {
    pub emotion: Emotion,
    pub trade_count: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
}

impl TradeStatistics {
    pub fn compute(trades: &[Trade]) -> Self {
        let closed: Vec<(&Trade, f64)> = trades
            .iter()
            .filter_map(|t| t.realized_pnl().map(|pnl| (t, pnl)))
            .collect();
        let pnls: Vec<f64> = closed.iter().map(|(_, pnl)| *pnl).collect();

        let wins: Vec<f64> = pnls.iter().copied().filter(|p| *p > 0.0).collect();
        let losses: Vec<f64> = pnls.iter().copied().filter(|p| *p < 0.0).collect();

        let gross_profit: f64 = wins.iter().sum();
        let gross_loss: f64 = losses.iter().map(|l| l.abs()).sum();
        let net_pnl: f64 = pnls.iter().sum();

        Self {
            total_trades: trades.len(),
            open_trades: trades.len() - closed.len(),
            closed_trades: closed.len(),
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            breakeven_trades: closed.len() - wins.len() - losses.len(),
            win_rate: percent(wins.len(), closed.len()),
            gross_profit,
            gross_loss,
            net_pnl,
            profit_factor: profit_factor(gross_profit, gross_loss),
            avg_win: average(gross_profit, wins.len()),
            avg_loss: average(gross_loss, losses.len()),
            expectancy: average(net_pnl, closed.len()),
            largest_win: wins.iter().copied().fold(0.0, f64::max),
            largest_loss: losses.iter().copied().fold(0.0, f64::min),
            by_emotion: emotion_breakdown(&closed),
        }
    }

    /// Emotion with the lowest average P&L, if any trades were tagged.
    pub fn worst_emotion(&self) -> Option<&EmotionStats> {
        self.by_emotion.iter().min_by(|a, b| {
            a.avg_pnl
                .partial_cmp(&b.avg_pnl)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Gross profit over gross loss. `None` without losses.
pub fn profit_factor(gross_profit: f64, gross_loss: f64) -> Option<f64> {
    if gross_loss < 1e-10 {
        return None;
    }
    Some(gross_profit / gross_loss)
}

fn emotion_breakdown(closed: &[(&Trade, f64)]) -> Vec<EmotionStats> {
    let mut groups: BTreeMap<Emotion, Vec<f64>> = BTreeMap::new();
    for (trade, pnl) in closed {
        if let Some(emotion) = trade.emotion {
            groups.entry(emotion).or_default().push(*pnl);
        }
    }
    groups
        .into_iter()
        .map(|(emotion, pnls)| {
            let total: f64 = pnls.iter().sum();
            let winners = pnls.iter().filter(|p| **p > 0.0).count();
            EmotionStats {
                emotion,
                trade_count: pnls.len(),
                win_rate: percent(winners, pnls.len()),
                total_pnl: total,
                avg_pnl: average(total, pnls.len()),
            }
        })
        .collect()
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total / count as f64
}
