//! Integration tests: CSV fixture → ingestion → report → artifacts.

use athlab_core::classify::Label;
use athlab_core::config::{AnalysisConfig, ReportConfig};
use athlab_core::data::{load_series, DataSource, LoadOptions, PriceField, SeriesSource};
use athlab_core::engine::underwater_curve;
use athlab_core::report::{generate_report, load_report, save_artifacts, AnalysisReport};
use chrono::NaiveDate;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_prices.csv")
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
}

fn opts(field: PriceField) -> LoadOptions {
    LoadOptions {
        start: d(1),
        end: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        price_field: field,
        synthetic_fallback: false,
    }
}

#[test]
fn fixture_ingestion_cleans_rows() {
    let path = fixture();
    let loaded = load_series("SAMPLE", SeriesSource::Csv(&path), &opts(PriceField::AdjClose)).unwrap();

    assert_eq!(loaded.source, DataSource::CsvImport);
    assert_eq!(loaded.series.len(), 12);
    assert_eq!(loaded.dropped_missing, 1);
    assert_eq!(loaded.dropped_duplicates, 1);

    // Out-of-order row sorted into place, first duplicate kept.
    let jan14 = loaded.series.position_of(d(14)).unwrap();
    assert_eq!(loaded.series[jan14].price, 108.0);
    assert_eq!(loaded.series[jan14 + 1].date, d(15));
    assert_eq!(loaded.series[1].price, 105.0);
}

#[test]
fn price_field_selects_column() {
    let path = fixture();
    let loaded = load_series("SAMPLE", SeriesSource::Csv(&path), &opts(PriceField::Close)).unwrap();
    assert_eq!(loaded.series[1].price, 106.0);
}

#[test]
fn date_range_limits_the_series() {
    let path = fixture();
    let mut o = opts(PriceField::AdjClose);
    o.start = d(6);
    o.end = d(10);
    let loaded = load_series("SAMPLE", SeriesSource::Csv(&path), &o).unwrap();
    assert_eq!(loaded.series.first().date, d(6));
    assert_eq!(loaded.series.last().date, d(10));
    assert_eq!(loaded.series.len(), 4);
}

#[test]
fn fixture_report_end_to_end() {
    let path = fixture();
    let loaded = load_series("SAMPLE", SeriesSource::Csv(&path), &opts(PriceField::AdjClose)).unwrap();
    let report = AnalysisReport::from_loaded(&loaded, &ReportConfig::default()).unwrap();

    let labels: Vec<Label> = report.episodes.iter().map(|c| c.label).collect();
    assert_eq!(labels, vec![Label::BearMarket, Label::Other, Label::Crash]);

    let first = &report.episodes[0].episode;
    assert_eq!(first.peak_date, d(2));
    assert_eq!(first.trough_date, d(8));
    assert_eq!(first.recovery_date, Some(d(10)));

    let open = report.unresolved_episode().unwrap();
    assert_eq!(open.episode.peak_date, d(15));
    assert_eq!(open.episode.trough_price, 60.0);

    let ath_dates: Vec<NaiveDate> = report.ath_events.iter().map(|e| e.date).collect();
    assert_eq!(ath_dates, vec![d(1), d(2), d(13), d(15)]);
    assert_eq!(report.time_to_new_high.max_days, Some(11));
    assert_eq!(report.time_to_new_high.median_days, Some(2.0));
    assert!(report.significant_gaps.is_empty());

    let gap = report.ongoing_gap.as_ref().unwrap();
    assert_eq!(gap.last_ath_date, d(15));
    assert_eq!(gap.days, 2);
    assert!((gap.drawdown_pct - (70.0 - 112.0) / 112.0).abs() < 1e-12);

    assert_eq!(report.deep_drawdowns.len(), 1);
    assert!(report.deep_drawdowns[0].ongoing);
    assert_eq!(report.deep_drawdowns[0].start_date, d(16));

    let text = generate_report(&report);
    assert!(text.contains("# Drawdown Report: SAMPLE"));
    assert!(text.contains("not yet recovered"));
}

#[test]
fn artifacts_round_trip_through_disk() {
    let path = fixture();
    let loaded = load_series("SAMPLE", SeriesSource::Csv(&path), &opts(PriceField::AdjClose)).unwrap();
    let report = AnalysisReport::from_loaded(&loaded, &ReportConfig::default()).unwrap();

    let out = tempfile::tempdir().unwrap();
    let dir = save_artifacts(&report, &underwater_curve(&loaded.series), out.path()).unwrap();

    let underwater = std::fs::read_to_string(dir.join("underwater.csv")).unwrap();
    assert_eq!(underwater.lines().count(), 1 + loaded.series.len());
    let episodes = std::fs::read_to_string(dir.join("episodes.csv")).unwrap();
    assert_eq!(episodes.lines().count(), 1 + report.episodes.len());

    assert_eq!(load_report(&dir).unwrap(), report);
}

#[test]
fn config_file_drives_report_settings() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("athlab.toml");
    std::fs::write(
        &cfg_path,
        "[data]\nprice_field = \"close\"\n\n[report]\nsignificant_gap_days = 5\ndeep_drawdown_threshold = -0.1\n",
    )
    .unwrap();
    let config = AnalysisConfig::from_file(&cfg_path).unwrap();

    let path = fixture();
    let mut o = opts(config.data.price_field);
    o.start = config.data.start.unwrap_or(o.start);
    let loaded = load_series("SAMPLE", SeriesSource::Csv(&path), &o).unwrap();
    let report = AnalysisReport::from_loaded(&loaded, &config.report).unwrap();

    // 01-02 close is 106, so the 01-10 print no longer recovers the first dip.
    assert_eq!(report.significant_gaps.len(), 1);
    assert_eq!(report.significant_gaps[0].from_date, d(2));
    assert_eq!(report.significant_gaps[0].to_date, d(13));
    assert_eq!(report.settings.deep_drawdown_threshold, -0.1);
    assert!(report.deep_drawdowns.len() >= 2);
}
