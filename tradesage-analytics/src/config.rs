//! Journal configuration — TOML file with data paths and analysis defaults.
//!
//! ```toml
//! [data]
//! strategies = "data/strategies.json"
//! runs = "data/runs.jsonl"
//! trades = "data/trades.csv"
//!
//! [analysis]
//! filter = "completed"
//! sort = "risk_adjusted_return"
//! direction = "descending"
//! per_page = 20
//!
//! [insights]
//! provider = "rules"
//! min_consistency = 70.0
//! max_drawdown = 15.0
//! ```
//!
//! Every field is optional. Relative data paths resolve against the config
//! file's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::RunFilter;
use crate::insights::{
    InsightProvider, InsightThresholds, RuleBasedInsightProvider, StaticInsightProvider,
};
use crate::listing::{SortDirection, SortKey};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
    pub insights: InsightsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub strategies: Option<PathBuf>,
    pub runs: Option<PathBuf>,
    pub trades: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub filter: RunFilter,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub per_page: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            filter: RunFilter::default(),
            sort: SortKey::default(),
            direction: SortDirection::default(),
            per_page: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Rules,
    Static,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" => Ok(Self::Rules),
            "static" => Ok(Self::Static),
            other => Err(format!("unknown insight provider '{other}' (expected rules or static)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub provider: ProviderKind,
    #[serde(flatten)]
    pub thresholds: InsightThresholds,
}

impl InsightsConfig {
    /// Build the configured provider.
    pub fn build_provider(&self) -> Box<dyn InsightProvider> {
        match self.provider {
            ProviderKind::Rules => Box::new(RuleBasedInsightProvider::new(self.thresholds)),
            ProviderKind::Static => Box::new(StaticInsightProvider::default()),
        }
    }
}

impl JournalConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, resolving relative data paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.data.resolve_relative_to(base);
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.per_page == 0 {
            return Err(ConfigError::Invalid("analysis.per_page must be at least 1".into()));
        }
        let t = &self.insights.thresholds;
        if !(0.0..=100.0).contains(&t.min_consistency) {
            return Err(ConfigError::Invalid(format!(
                "insights.min_consistency must be within 0..=100, got {}",
                t.min_consistency
            )));
        }
        if !t.max_drawdown.is_finite() || t.max_drawdown < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "insights.max_drawdown must be a non-negative number, got {}",
                t.max_drawdown
            )));
        }
        Ok(())
    }
}

impl DataConfig {
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [&mut self.strategies, &mut self.runs, &mut self.trades]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
