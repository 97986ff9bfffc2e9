//! Strategy — a named, configured set of trading rules that can be backtested.

use serde::{Deserialize, Serialize};

use super::ids::StrategyId;

/// Broad family of a strategy. Unknown values from the backend map to `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    TrendFollowing,
    MeanReversion,
    Breakout,
    Momentum,
    Scalping,
    Swing,
    #[default]
    #[serde(other)]
    Custom,
}

impl StrategyType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TrendFollowing => "trend_following",
            Self::MeanReversion => "mean_reversion",
            Self::Breakout => "breakout",
            Self::Momentum => "momentum",
            Self::Scalping => "scalping",
            Self::Swing => "swing",
            Self::Custom => "custom",
        }
    }
}

/// Risk limits attached to a strategy. All limits are optional percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskManagement {
    pub stop_loss_percent: Option<f64>,
    pub take_profit_percent: Option<f64>,
    pub max_position_size_percent: Option<f64>,
    pub max_daily_loss_percent: Option<f64>,
}

impl RiskManagement {
    /// Reward-to-risk ratio implied by take-profit / stop-loss, when both are set.
    pub fn reward_risk_ratio(&self) -> Option<f64> {
        match (self.take_profit_percent, self.stop_loss_percent) {
            (Some(tp), Some(sl)) if sl > 0.0 => Some(tp / sl),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: StrategyId,
    pub name: String,
    #[serde(default)]
    pub strategy_type: StrategyType,
    #[serde(default)]
    pub risk_management: RiskManagement,
}

impl Strategy {
    pub fn new(id: impl Into<String>, name: impl Into<String>, strategy_type: StrategyType) -> Self {
        Self {
            id: StrategyId::new(id),
            name: name.into(),
            strategy_type,
            risk_management: RiskManagement::default(),
        }
    }
}
