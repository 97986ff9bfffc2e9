//! Flat CSV row shapes for records whose JSON form is nested.

use serde::Deserialize;

use crate::domain::{RiskManagement, Strategy, StrategyId, StrategyType};

/// A strategy with its risk limits flattened into columns.
#[derive(Debug, Deserialize)]
pub(super) struct StrategyRow {
    id: StrategyId,
    name: String,
    #[serde(default)]
    strategy_type: Option<StrategyType>,
    #[serde(default)]
    stop_loss_percent: Option<f64>,
    #[serde(default)]
    take_profit_percent: Option<f64>,
    #[serde(default)]
    max_position_size_percent: Option<f64>,
    #[serde(default)]
    max_daily_loss_percent: Option<f64>,
}

impl From<StrategyRow> for Strategy {
    fn from(row: StrategyRow) -> Self {
        Strategy {
            id: row.id,
            name: row.name,
            strategy_type: row.strategy_type.unwrap_or_default(),
            risk_management: RiskManagement {
                stop_loss_percent: row.stop_loss_percent,
                take_profit_percent: row.take_profit_percent,
                max_position_size_percent: row.max_position_size_percent,
                max_daily_loss_percent: row.max_daily_loss_percent,
            },
        }
    }
}
