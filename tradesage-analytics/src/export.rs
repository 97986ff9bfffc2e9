//! Export — render summaries and rankings as text, CSV, JSON or Markdown.
//!
//! Percentages and ratios are formatted to two decimals in the text, CSV and
//! Markdown renderings. JSON keeps full precision.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::StrategyPerformanceSummary;
use crate::compare::RankedStrategy;
use crate::grade::GradedRun;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Table,
    Csv,
    Json,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!(
                "unknown format '{other}' (expected table, csv, json or markdown)"
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to flush CSV writer: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

const SUMMARY_HEADER: [&str; 11] = [
    "strategy_id",
    "strategy",
    "backtests",
    "avg_return_pct",
    "avg_win_rate_pct",
    "avg_drawdown_pct",
    "total_trades",
    "consistency",
    "risk_adjusted_return",
    "best_return_pct",
    "worst_return_pct",
];

fn summary_cells(s: &StrategyPerformanceSummary) -> Vec<String> {
    vec![
        s.strategy.id.to_string(),
        s.strategy.name.clone(),
        s.backtest_count.to_string(),
        format!("{:.2}", s.avg_return),
        format!("{:.2}", s.avg_win_rate),
        format!("{:.2}", s.avg_drawdown),
        s.total_trades.to_string(),
        format!("{:.2}", s.consistency),
        format!("{:.2}", s.risk_adjusted_return),
        format!("{:.2}", s.best_return),
        format!("{:.2}", s.worst_return),
    ]
}

pub fn render_summaries(
    summaries: &[StrategyPerformanceSummary],
    format: ExportFormat,
) -> Result<String, ExportError> {
    let rows: Vec<Vec<String>> = summaries.iter().map(summary_cells).collect();
    match format {
        ExportFormat::Table => Ok(text_table(&SUMMARY_HEADER, &rows)),
        ExportFormat::Csv => csv_table(&SUMMARY_HEADER, &rows),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(summaries)?),
        ExportFormat::Markdown => Ok(markdown_table(&SUMMARY_HEADER, &rows)),
    }
}

pub fn render_ranking(
    ranked: &[RankedStrategy],
    format: ExportFormat,
) -> Result<String, ExportError> {
    let mut header = vec!["rank"];
    header.extend_from_slice(&SUMMARY_HEADER);
    let rows: Vec<Vec<String>> = ranked
        .iter()
        .map(|r| {
            let mut row = vec![r.rank.to_string()];
            row.extend(summary_cells(&r.summary));
            row
        })
        .collect();
    match format {
        ExportFormat::Table => Ok(text_table(&header, &rows)),
        ExportFormat::Csv => csv_table(&header, &rows),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(ranked)?),
        ExportFormat::Markdown => Ok(markdown_table(&header, &rows)),
    }
}

pub fn render_grades(graded: &[GradedRun], format: ExportFormat) -> Result<String, ExportError> {
    let header = ["run_id", "win_rate_pts", "return_pts", "drawdown_pts", "total", "grade"];
    let rows: Vec<Vec<String>> = graded
        .iter()
        .map(|g| {
            let b = &g.breakdown;
            vec![
                g.run_id.to_string(),
                b.win_rate_points.to_string(),
                b.return_points.to_string(),
                b.drawdown_points.to_string(),
                b.total.to_string(),
                b.grade.to_string(),
            ]
        })
        .collect();
    match format {
        ExportFormat::Table => Ok(text_table(&header, &rows)),
        ExportFormat::Csv => csv_table(&header, &rows),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(graded)?),
        ExportFormat::Markdown => Ok(markdown_table(&header, &rows)),
    }
}

// ─── Encoders ───────────────────────────────────────────────────────

fn csv_table(header: &[&str], rows: &[Vec<String>]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(data)?)
}

fn markdown_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| {} |", header.join(" | "));
    let _ = writeln!(
        out,
        "|{}|",
        header.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    );
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}

fn text_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "{}", line(header.to_vec()));
    let _ = writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    );
    for row in rows {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
    out
}
