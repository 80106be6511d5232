//! Analysis configuration, loaded from TOML.
//!
//! ```toml
//! [data]
//! start = "2000-01-01"        # omitted: full history
//! end = "2024-12-31"          # omitted: today
//! exchange_suffix = ".NS"     # appended to bare tickers; "" disables
//! price_field = "adj_close"   # or "close"
//!
//! [report]
//! significant_gap_days = 30
//! deep_drawdown_threshold = -0.25
//! ```
//!
//! Every key is optional. CLI flags override whatever the file sets.

use crate::data::PriceField;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// First date requested when no start is configured ("max" history).
pub fn full_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data: DataConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub exchange_suffix: String,
    pub price_field: PriceField,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            exchange_suffix: ".NS".into(),
            price_field: PriceField::AdjClose,
        }
    }
}

impl DataConfig {
    pub fn start_or_full_history(&self) -> NaiveDate {
        self.start.unwrap_or_else(full_history_start)
    }

    pub fn end_or(&self, today: NaiveDate) -> NaiveDate {
        self.end.unwrap_or(today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// ATH gaps longer than this many calendar days are called out.
    pub significant_gap_days: i64,
    /// Underwater level (negative fraction) that marks a deep drawdown period.
    pub deep_drawdown_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            significant_gap_days: 30,
            deep_drawdown_threshold: -0.25,
        }
    }
}

impl AnalysisConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.report.deep_drawdown_threshold;
        if !(threshold > -1.0 && threshold < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "deep_drawdown_threshold must be in (-1, 0), got {threshold}"
            )));
        }
        if self.report.significant_gap_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "significant_gap_days must be >= 0, got {}",
                self.report.significant_gap_days
            )));
        }
        if let (Some(start), Some(end)) = (self.data.start, self.data.end) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "start {start} is after end {end}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = AnalysisConfig::from_toml("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.data.exchange_suffix, ".NS");
        assert_eq!(config.data.price_field, PriceField::AdjClose);
        assert_eq!(config.report.significant_gap_days, 30);
        assert_eq!(config.report.deep_drawdown_threshold, -0.25);
        assert_eq!(
            config.data.start_or_full_history(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
    }

    #[test]
    fn parses_all_sections() {
        let config = AnalysisConfig::from_toml(
            r#"
[data]
start = "2010-01-04"
end = "2020-12-31"
exchange_suffix = ""
price_field = "close"

[report]
significant_gap_days = 90
deep_drawdown_threshold = -0.3
"#,
        )
        .unwrap();
        assert_eq!(config.data.start, NaiveDate::from_ymd_opt(2010, 1, 4));
        assert_eq!(config.data.price_field, PriceField::Close);
        assert!(config.data.exchange_suffix.is_empty());
        assert_eq!(config.report.significant_gap_days, 90);
        assert_eq!(config.report.deep_drawdown_threshold, -0.3);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = AnalysisConfig::from_toml("[report]\nsignificant_gap_days = 10\n").unwrap();
        assert_eq!(config.report.significant_gap_days, 10);
        assert_eq!(config.report.deep_drawdown_threshold, -0.25);
    }

    #[test]
    fn rejects_positive_threshold() {
        let err = AnalysisConfig::from_toml("[report]\ndeep_drawdown_threshold = 0.2\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = AnalysisConfig::from_toml(
            "[data]\nstart = \"2020-01-01\"\nend = \"2019-01-01\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("after end"));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            AnalysisConfig::from_toml("[report\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("athlab.toml");
        std::fs::write(&path, "[data]\nprice_field = \"close\"\n").unwrap();
        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.data.price_field, PriceField::Close);

        let missing = AnalysisConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
