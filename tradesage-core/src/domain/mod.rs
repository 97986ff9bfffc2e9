//! Domain types for TradeSage

pub mod backtest;
pub mod ids;
pub mod strategy;
pub mod trade;

pub use backtest::{BacktestRun, ParseStatusError, RunStatus};
pub use ids::{DatasetHash, RunId, StrategyId, TradeId};
pub use strategy::{RiskManagement, Strategy, StrategyType};
pub use trade::{Emotion, Trade, TradeSide};
