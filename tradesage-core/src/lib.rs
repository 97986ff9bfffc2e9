//! TradeSage Core — domain types, fingerprints and record loading.
//!
//! This crate holds the plain records every other crate works on:
//! - Strategies with their risk-management limits
//! - Backtest runs and their lifecycle status
//! - Journal trades with psychology tags
//! - BLAKE3 content fingerprints of record sets
//! - JSON / JSONL / CSV loaders standing in for the backend API client

pub mod data;
pub mod domain;
pub mod fingerprint;

pub use data::{load_runs, load_strategies, load_trades, LoadError, RecordFormat};
pub use domain::{
    BacktestRun, DatasetHash, Emotion, RiskManagement, RunId, RunStatus, Strategy, StrategyId,
    StrategyType, Trade, TradeId, TradeSide,
};
pub use fingerprint::fingerprint;
