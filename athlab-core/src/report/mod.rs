//! Analysis report: everything computed for one symbol, in one serializable
//! value.
//!
//! [`AnalysisReport::build`] runs the drawdown engine, classifies the
//! episodes and derives the time-to-new-high statistics. The result is what
//! the CLI prints and what `export` writes as `report.json`.

pub mod export;
pub mod text;

use crate::classify::{
    classify, ongoing_gap, summarize_labels, time_to_new_high_stats, AthGap, ClassifiedEpisode,
    InvariantViolation, LabelSummary, OngoingGap, TimeToNewHighStats,
};
use crate::config::ReportConfig;
use crate::data::{DataSource, LoadedSeries};
use crate::domain::{DatasetHash, PriceSeries};
use crate::engine::{
    analyze, deep_drawdown_periods, underwater_curve, AllTimeHighEvent, DeepDrawdownPeriod,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use export::{
    ath_gaps_csv, episodes_csv, export_json, import_json, load_report, save_artifacts,
    underwater_csv,
};
pub use text::{generate_report, generate_summary_table};

/// Bumped whenever a field is removed or changes meaning.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("episode invariants violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported schema version {found} (max supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("CSV output is not valid UTF-8")]
    Encoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub schema_version: u32,
    pub symbol: String,
    pub source: DataSource,
    pub dataset_hash: DatasetHash,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub observations: usize,
    pub last_price: f64,
    /// Underwater value on the last date; 0.0 when the series ends on a high.
    pub current_drawdown_pct: f64,
    /// Most negative underwater value over the whole series.
    pub max_drawdown_pct: f64,
    pub settings: ReportConfig,
    pub episodes: Vec<ClassifiedEpisode>,
    pub label_summary: Vec<LabelSummary>,
    pub ath_events: Vec<AllTimeHighEvent>,
    pub time_to_new_high: TimeToNewHighStats,
    pub significant_gaps: Vec<AthGap>,
    pub ongoing_gap: Option<OngoingGap>,
    pub deep_drawdowns: Vec<DeepDrawdownPeriod>,
}

impl AnalysisReport {
    pub fn build(
        symbol: &str,
        source: DataSource,
        series: &PriceSeries,
        settings: &ReportConfig,
    ) -> Result<Self, ReportError> {
        let analysis = analyze(series);
        let episodes = classify(&analysis.episodes)?;
        let time_to_new_high = time_to_new_high_stats(&analysis.ath_events)?;
        let significant_gaps = time_to_new_high
            .significant(settings.significant_gap_days)
            .into_iter()
            .cloned()
            .collect();

        let underwater = underwater_curve(series);
        let current_drawdown_pct = underwater.last().map_or(0.0, |p| p.drawdown_pct);
        let max_drawdown_pct = underwater
            .iter()
            .map(|p| p.drawdown_pct)
            .fold(0.0_f64, f64::min);

        let last = series.last();
        let report = Self {
            schema_version: SCHEMA_VERSION,
            symbol: symbol.to_string(),
            source,
            dataset_hash: DatasetHash::of_series(series),
            first_date: series.first().date,
            last_date: last.date,
            observations: series.len(),
            last_price: last.price,
            current_drawdown_pct,
            max_drawdown_pct,
            settings: settings.clone(),
            label_summary: summarize_labels(&episodes),
            episodes,
            ongoing_gap: ongoing_gap(series, &analysis.ath_events),
            ath_events: analysis.ath_events,
            time_to_new_high,
            significant_gaps,
            deep_drawdowns: deep_drawdown_periods(series, settings.deep_drawdown_threshold),
        };

        log::debug!(
            "{symbol}: report built ({} episodes, {} ATH events, {} significant gaps)",
            report.episodes.len(),
            report.ath_events.len(),
            report.significant_gaps.len()
        );
        Ok(report)
    }

    pub fn from_loaded(loaded: &LoadedSeries, settings: &ReportConfig) -> Result<Self, ReportError> {
        Self::build(&loaded.symbol, loaded.source, &loaded.series, settings)
    }

    /// Deepest episode; the earliest one wins ties.
    pub fn deepest_episode(&self) -> Option<&ClassifiedEpisode> {
        self.episodes.iter().fold(None, |best, c| match best {
            Some(b) if b.episode.depth_pct <= c.episode.depth_pct => Some(b),
            _ => Some(c),
        })
    }

    /// The still-open episode, if the series ends underwater.
    pub fn unresolved_episode(&self) -> Option<&ClassifiedEpisode> {
        self.episodes.last().filter(|c| !c.episode.is_resolved())
    }

    pub fn is_synthetic(&self) -> bool {
        self.source.is_synthetic()
    }
}
