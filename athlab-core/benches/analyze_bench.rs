//! Criterion benchmarks for the analysis hot paths.
//!
//! Benchmarks:
//! 1. Drawdown scan (`analyze`) over 1y / 10y / 50y of daily prices
//! 2. Classification and time-to-new-high statistics
//! 3. Full report assembly

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use athlab_core::classify::{classify, time_to_new_high_stats};
use athlab_core::config::ReportConfig;
use athlab_core::data::{ingest, synthetic::generate_synthetic_quotes, DataSource, PriceField};
use athlab_core::domain::PriceSeries;
use athlab_core::engine::{analyze, underwater_curve};
use athlab_core::report::AnalysisReport;

// ── Helpers ──────────────────────────────────────────────────────────

/// Roughly `years` of weekday prices from the synthetic walk.
fn make_series(years: i64) -> PriceSeries {
    let start = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let end = start + chrono::Duration::days(365 * years);
    let quotes = generate_synthetic_quotes("BENCH", start, end);
    ingest(quotes, PriceField::AdjClose, "BENCH").unwrap().series
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for &years in &[1i64, 10, 50] {
        let series = make_series(years);
        group.bench_with_input(BenchmarkId::new("scan", series.len()), &series, |b, s| {
            b.iter(|| analyze(black_box(s)));
        });
        group.bench_with_input(
            BenchmarkId::new("underwater", series.len()),
            &series,
            |b, s| {
                b.iter(|| underwater_curve(black_box(s)));
            },
        );
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let analysis = analyze(&make_series(50));

    group.bench_function("labels_50y", |b| {
        b.iter(|| classify(black_box(&analysis.episodes)));
    });
    group.bench_function("ath_gaps_50y", |b| {
        b.iter(|| time_to_new_high_stats(black_box(&analysis.ath_events)));
    });

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");
    let series = make_series(50);
    let settings = ReportConfig::default();

    group.bench_function("build_50y", |b| {
        b.iter(|| {
            AnalysisReport::build(
                "BENCH",
                DataSource::Synthetic,
                black_box(&series),
                black_box(&settings),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_classify, bench_report);
criterion_main!(benches);
