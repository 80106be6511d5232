//! AthLab Core: drawdown, recovery and correction analysis of price series.
//!
//! This crate contains:
//! - Domain types (validated price series, dataset hashes)
//! - Single-pass drawdown engine producing episodes and all-time-high events
//! - Severity classification and time-to-new-high statistics
//! - Price sources (Yahoo Finance, CSV, synthetic) and ingestion
//! - Report assembly and JSON/CSV/Markdown export

pub mod classify;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod report;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: analysis inputs and outputs are Send + Sync so the
    /// CLI can analyze symbols on a thread pool.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::DatasetHash>();
        require_sync::<domain::DatasetHash>();

        require_send::<engine::Analysis>();
        require_sync::<engine::Analysis>();
        require_send::<engine::DrawdownEngine>();
        require_sync::<engine::DrawdownEngine>();

        require_send::<classify::ClassifiedEpisode>();
        require_sync::<classify::ClassifiedEpisode>();
        require_send::<classify::InvariantViolation>();
        require_sync::<classify::InvariantViolation>();

        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::LoadedSeries>();
        require_sync::<data::LoadedSeries>();

        require_send::<config::AnalysisConfig>();
        require_sync::<config::AnalysisConfig>();
        require_send::<report::AnalysisReport>();
        require_sync::<report::AnalysisReport>();
        require_send::<report::ReportError>();
        require_sync::<report::ReportError>();
    }

    /// The engine runs straight off a validated series built from raw pairs.
    #[test]
    fn engine_runs_on_validated_series() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = domain::PriceSeries::from_pairs(
            [10.0, 12.0, 9.0, 13.0]
                .iter()
                .enumerate()
                .map(|(i, &p)| (start + chrono::Duration::days(i as i64), p)),
        )
        .unwrap();
        let analysis = engine::DrawdownEngine.analyze(&series);
        assert_eq!(analysis.ath_events.len(), 3);
        assert_eq!(analysis.episodes.len(), 1);
        assert_eq!(analysis.episodes[0].trough_price, 9.0);
        assert!(analysis.open_episode().is_none());

        assert!(domain::PriceSeries::from_pairs(Vec::<(chrono::NaiveDate, f64)>::new()).is_err());
    }
}
