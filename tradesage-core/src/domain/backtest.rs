//! BacktestRun — a single simulated execution of a strategy over historical data.
//!
//! Runs are produced by a backend process and are read-only here. Metric fields
//! are `None` until the run completes (and sometimes after, if the backend failed
//! to compute them).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{RunId, StrategyId};

/// Lifecycle status of a backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[serde(alias = "Pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "Running", alias = "RUNNING")]
    Running,
    #[serde(alias = "Completed", alias = "COMPLETED")]
    Completed,
    #[serde(alias = "Failed", alias = "FAILED")]
    Failed,
    #[serde(alias = "Cancelled", alias = "CANCELLED")]
    Cancelled,
}

impl RunStatus {
    pub const ALL: [RunStatus; 5] = [
        Self::Pending,
        Self::Running,
        Self::Completed,
        Self::Failed,
        Self::Cancelled,
    ];

    /// True once the run can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown run status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for RunStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRun {
    pub id: RunId,
    pub strategy_id: StrategyId,
    pub status: RunStatus,
    #[serde(default)]
    pub total_return_percent: Option<f64>,
    /// Fraction of winning trades in [0, 1].
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub max_drawdown_percent: Option<f64>,
    #[serde(default)]
    pub total_trades: Option<u64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl BacktestRun {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    // Missing metrics read as zero. Aggregates and grades rely on this.

    pub fn return_or_zero(&self) -> f64 {
        self.total_return_percent.unwrap_or(0.0)
    }

    pub fn win_rate_or_zero(&self) -> f64 {
        self.win_rate.unwrap_or(0.0)
    }

    pub fn drawdown_or_zero(&self) -> f64 {
        self.max_drawdown_percent.unwrap_or(0.0)
    }

    pub fn trades_or_zero(&self) -> u64 {
        self.total_trades.unwrap_or(0)
    }

    /// Wall-clock duration of the run in seconds, if it has finished.
    pub fn duration_secs(&self) -> Option<i64> {
        self.completed_at
            .map(|done| (done - self.created_at).num_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run_json(status: &str) -> String {
        format!(
            r#"{{"id":"r1","strategy_id":"s1","status":"{status}",
                "total_return_percent":12.5,"win_rate":0.55,
                "created_at":"2024-03-01T09:30:00Z"}}"#
        )
    }

    #[test]
    fn status_accepts_lower_and_title_case() {
        let a: BacktestRun = serde_json::from_str(&run_json("completed")).unwrap();
        let b: BacktestRun = serde_json::from_str(&run_json("Completed")).unwrap();
        assert_eq!(a.status, RunStatus::Completed);
        assert_eq!(b.status, RunStatus::Completed);
    }

    #[test]
    fn missing_metrics_default_to_none_and_read_as_zero() {
        let run: BacktestRun = serde_json::from_str(&run_json("running")).unwrap();
        assert_eq!(run.max_drawdown_percent, None);
        assert_eq!(run.total_trades, None);
        assert_eq!(run.drawdown_or_zero(), 0.0);
        assert_eq!(run.trades_or_zero(), 0);
        assert_eq!(run.return_or_zero(), 12.5);
        assert!(!run.is_completed());
    }

    #[test]
    fn status_from_str() {
        assert_eq!("FAILED".parse::<RunStatus>().unwrap(), RunStatus::Failed);
        assert_eq!(" cancelled ".parse::<RunStatus>().unwrap(), RunStatus::Cancelled);
        assert!("done".parse::<RunStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(!RunStatus::Pending.is_terminal());
    }

    #[test]
    fn duration_from_timestamps() {
        let mut run: BacktestRun = serde_json::from_str(&run_json("completed")).unwrap();
        assert_eq!(run.duration_secs(), None);
        run.completed_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 31, 30).unwrap());
        assert_eq!(run.duration_secs(), Some(90));
    }
}
