//! Backtest grade — a letter grade for a single completed run from three
//! weighted bands (win rate, total return, max drawdown).
//!
//! | band          | thresholds (points)                       |
//! |---------------|-------------------------------------------|
//! | win rate %    | ≥70 (30), ≥60 (20), ≥50 (10)              |
//! | total return %| ≥20 (30), ≥10 (20), ≥5 (10)               |
//! | max drawdown %| ≤5 (40), ≤10 (30), ≤15 (20), ≤20 (10)     |
//!
//! Total points map to A (≥80), B (≥65), C (≥50), D (≥35), else F.

use serde::{Deserialize, Serialize};
use std::fmt;

use tradesage_core::{BacktestRun, RunId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrategyGrade {
    A,
    B,
    C,
    D,
    F,
}

impl StrategyGrade {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::A,
            65..=79 => Self::B,
            50..=64 => Self::C,
            35..=49 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for StrategyGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded per band, their sum and the resulting grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBreakdown {
    pub win_rate_points: u32,
    pub return_points: u32,
    pub drawdown_points: u32,
    pub total: u32,
    pub grade: StrategyGrade,
}

/// A graded run, as listed in the backtest table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedRun {
    pub run_id: RunId,
    pub breakdown: GradeBreakdown,
}

pub fn win_rate_points(win_rate_percent: f64) -> u32 {
    if win_rate_percent >= 70.0 {
        30
    } else if win_rate_percent >= 60.0 {
        20
    } else if win_rate_percent >= 50.0 {
        10
    } else {
        0
    }
}

pub fn return_points(total_return_percent: f64) -> u32 {
    if total_return_percent >= 20.0 {
        30
    } else if total_return_percent >= 10.0 {
        20
    } else if total_return_percent >= 5.0 {
        10
    } else {
        0
    }
}

pub fn drawdown_points(max_drawdown_percent: f64) -> u32 {
    if max_drawdown_percent <= 5.0 {
        40
    } else if max_drawdown_percent <= 10.0 {
        30
    } else if max_drawdown_percent <= 15.0 {
        20
    } else if max_drawdown_percent <= 20.0 {
        10
    } else {
        0
    }
}

/// Grade raw metrics. Pure function of its three inputs.
pub fn grade_metrics(
    win_rate_percent: f64,
    total_return_percent: f64,
    max_drawdown_percent: f64,
) -> GradeBreakdown {
    let win_rate_points = win_rate_points(win_rate_percent);
    let return_points = return_points(total_return_percent);
    let drawdown_points = drawdown_points(max_drawdown_percent);
    let total = win_rate_points + return_points + drawdown_points;
    GradeBreakdown {
        win_rate_points,
        return_points,
        drawdown_points,
        total,
        grade: StrategyGrade::from_score(total),
    }
}

/// Grade a run. Only completed runs are graded; any other status yields `None`.
///
/// `win_rate` is stored as a fraction and converted to percent here. Missing
/// metrics read as 0.
pub fn grade_run(run: &BacktestRun) -> Option<GradeBreakdown> {
    if !run.is_completed() {
        return None;
    }
    Some(grade_metrics(
        run.win_rate_or_zero() * 100.0,
        run.return_or_zero(),
        run.drawdown_or_zero(),
    ))
}

/// Grade every completed run, preserving input order.
pub fn grade_runs(runs: &[BacktestRun]) -> Vec<GradedRun> {
    runs.iter()
        .filter_map(|run| {
            grade_run(run).map(|breakdown| GradedRun {
                run_id: run.id.clone(),
                breakdown,
            })
        })
        .collect()
}
