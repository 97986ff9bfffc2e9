//! Record loading — strategies, backtest runs and journal trades from disk.
//!
//! Stands in for the backend HTTP client: the analytics layer only ever sees
//! already-materialized `Vec`s. The format is chosen from the file extension:
//!
//! - `.json`  — a single JSON array of records
//! - `.jsonl` — one JSON object per line (blank lines skipped)
//! - `.csv`   — header row; an empty cell reads as null

mod rows;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::{BacktestRun, Strategy, Trade};
use rows::StrategyRow;

/// On-disk record encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    JsonLines,
    Csv,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("jsonl") | Some("ndjson") => Ok(Self::JsonLines),
            Some("csv") => Ok(Self::Csv),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::JsonLines => f.write_str("jsonl"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

/// Errors from record loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported record file (expected .json, .jsonl or .csv): {0}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid JSON on line {line} of {path}: {source}")]
    JsonLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub fn load_strategies(path: &Path) -> Result<Vec<Strategy>, LoadError> {
    let format = RecordFormat::from_path(path)?;
    let content = read(path)?;
    let strategies = match format {
        RecordFormat::Csv => parse_records::<StrategyRow>(&content, format, path)?
            .into_iter()
            .map(Strategy::from)
            .collect(),
        _ => parse_records(&content, format, path)?,
    };
    log::info!("loaded {} strategies from {}", strategies.len(), path.display());
    Ok(strategies)
}

pub fn load_runs(path: &Path) -> Result<Vec<BacktestRun>, LoadError> {
    let runs: Vec<BacktestRun> = load_records(path)?;
    log::info!("loaded {} backtest runs from {}", runs.len(), path.display());
    Ok(runs)
}

pub fn load_trades(path: &Path) -> Result<Vec<Trade>, LoadError> {
    let trades: Vec<Trade> = load_records(path)?;
    log::info!("loaded {} journal trades from {}", trades.len(), path.display());
    Ok(trades)
}

/// Load flat records of any deserializable type, choosing the format by extension.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let format = RecordFormat::from_path(path)?;
    let content = read(path)?;
    parse_records(&content, format, path)
}

/// Parse records from an in-memory string. `source` is only used in error messages.
pub fn parse_records<T: DeserializeOwned>(
    content: &str,
    format: RecordFormat,
    source: &Path,
) -> Result<Vec<T>, LoadError> {
    match format {
        RecordFormat::Json => serde_json::from_str(content).map_err(|e| LoadError::Json {
            path: source.to_path_buf(),
            source: e,
        }),
        RecordFormat::JsonLines => {
            let mut records = Vec::new();
            for (idx, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let record = serde_json::from_str(line).map_err(|e| LoadError::JsonLine {
                    path: source.to_path_buf(),
                    line: idx + 1,
                    source: e,
                })?;
                records.push(record);
            }
            Ok(records)
        }
        RecordFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(content.as_bytes());
            reader
                .deserialize()
                .collect::<Result<Vec<T>, _>>()
                .map_err(|e| LoadError::Csv {
                    path: source.to_path_buf(),
                    source: e,
                })
        }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RunStatus;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            RecordFormat::from_path(Path::new("runs.JSON")).unwrap(),
            RecordFormat::Json
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("runs.ndjson")).unwrap(),
            RecordFormat::JsonLines
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("a/b/runs.csv")).unwrap(),
            RecordFormat::Csv
        );
        assert!(matches!(
            RecordFormat::from_path(Path::new("runs.parquet")),
            Err(LoadError::UnsupportedFormat(_))
        ));
        assert!(RecordFormat::from_path(Path::new("runs")).is_err());
    }

    #[test]
    fn jsonl_skips_blank_lines_and_reports_line_numbers() {
        let good = concat!(
            r#"{"id":"r1","strategy_id":"s1","status":"completed","created_at":"2024-01-01T00:00:00Z"}"#,
            "\n\n",
            r#"{"id":"r2","strategy_id":"s1","status":"failed","created_at":"2024-01-02T00:00:00Z"}"#,
            "\n",
        );
        let runs: Vec<BacktestRun> =
            parse_records(good, RecordFormat::JsonLines, Path::new("mem.jsonl")).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].status, RunStatus::Failed);

        let bad = format!("{good}\n{{not json}}\n");
        let err = parse_records::<BacktestRun>(&bad, RecordFormat::JsonLines, Path::new("mem.jsonl"))
            .unwrap_err();
        match err {
            LoadError::JsonLine { line, .. } => assert_eq!(line, 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn csv_empty_cells_are_none() {
        let csv = "\
id,strategy_id,status,total_return_percent,win_rate,max_drawdown_percent,total_trades,created_at,completed_at
r1,s1,completed,12.5,0.6,4.0,30,2024-01-01T00:00:00Z,2024-01-01T00:05:00Z
r2,s1,running,,,,,2024-01-02T00:00:00Z,
";
        let runs: Vec<BacktestRun> =
            parse_records(csv, RecordFormat::Csv, Path::new("mem.csv")).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].total_trades, Some(30));
        assert_eq!(runs[1].total_return_percent, None);
        assert_eq!(runs[1].completed_at, None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_runs(Path::new("/nonexistent/tradesage/runs.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
