//! Run filter — which backtest runs feed the performance aggregator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tradesage_core::BacktestRun;

/// Filter mode selected in the strategy performance view.
///
/// `All` keeps only completed runs, the same as `Completed`. Runs that never
/// finished carry no metrics worth averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunFilter {
    All,
    #[default]
    Completed,
    Profitable,
}

impl RunFilter {
    pub fn matches(&self, run: &BacktestRun) -> bool {
        match self {
            Self::All | Self::Completed => run.is_completed(),
            Self::Profitable => {
                run.is_completed() && run.total_return_percent.is_some_and(|r| r > 0.0)
            }
        }
    }

    /// Keep matching runs, preserving input order.
    pub fn apply<'a>(&self, runs: &'a [BacktestRun]) -> Vec<&'a BacktestRun> {
        runs.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Profitable => "profitable",
        }
    }
}

impl fmt::Display for RunFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "profitable" => Ok(Self::Profitable),
            other => Err(format!(
                "unknown filter '{other}' (expected all, completed or profitable)"
            )),
        }
    }
}
