//! Human-readable Markdown rendering of reports.

use super::AnalysisReport;
use crate::classify::Label;
use std::fmt::Write;

fn pct(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

fn days(v: Option<i64>) -> String {
    v.map_or_else(|| "-".to_string(), |d| d.to_string())
}

/// Markdown report for one symbol.
pub fn generate_report(report: &AnalysisReport) -> String {
    let mut md = String::with_capacity(4096);

    let _ = writeln!(md, "# Drawdown Report: {}\n", report.symbol);

    md.push_str("## Overview\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    let _ = writeln!(
        md,
        "| Period | {} to {} |",
        report.first_date, report.last_date
    );
    let _ = writeln!(md, "| Observations | {} |", report.observations);
    let _ = writeln!(md, "| Last Price | {:.2} |", report.last_price);
    let _ = writeln!(
        md,
        "| Current Drawdown | {} |",
        pct(report.current_drawdown_pct)
    );
    let _ = writeln!(md, "| Max Drawdown | {} |", pct(report.max_drawdown_pct));
    let _ = writeln!(md, "| All-Time Highs | {} |", report.ath_events.len());
    let _ = writeln!(md, "| Dataset Hash | {} |", report.dataset_hash.short());
    if report.is_synthetic() {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    if let Some(c) = report.deepest_episode() {
        let ep = &c.episode;
        md.push_str("## Deepest Drawdown\n\n");
        let _ = writeln!(
            md,
            "{} from {:.2} on {} to {:.2} on {} ({}, {})",
            pct(ep.depth_pct),
            ep.peak_price,
            ep.peak_date,
            ep.trough_price,
            ep.trough_date,
            c.label,
            match ep.recovery_date {
                Some(d) => format!("recovered {d}"),
                None => "not yet recovered".to_string(),
            }
        );
        md.push('\n');
    }

    md.push_str("## Classification\n\n");
    md.push_str("| Label | Range | Count | Unresolved | Worst | Mean Days to Recovery |\n");
    md.push_str("| --- | --- | --- | --- | --- | --- |\n");
    for s in report.label_summary.iter().rev() {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {} | {} |",
            s.label,
            s.label.range(),
            s.count,
            s.unresolved,
            s.worst_depth_pct.map_or_else(|| "-".to_string(), pct),
            s.mean_days_to_recovery
                .map_or_else(|| "-".to_string(), |d| format!("{d:.0}")),
        );
    }
    md.push('\n');

    let material: Vec<_> = report
        .episodes
        .iter()
        .filter(|c| c.label != Label::Other)
        .collect();
    if !material.is_empty() {
        md.push_str("## Episodes\n\n");
        md.push_str("| Label | Peak | Trough | Recovery | Depth | Days to Trough | Days to Recovery |\n");
        md.push_str("| --- | --- | --- | --- | --- | --- | --- |\n");
        for c in material {
            let ep = &c.episode;
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} | {} | {} |",
                c.label,
                ep.peak_date,
                ep.trough_date,
                ep.recovery_date
                    .map_or_else(|| "open".to_string(), |d| d.to_string()),
                pct(ep.depth_pct),
                ep.duration_to_trough,
                days(ep.duration_to_recovery),
            );
        }
        md.push('\n');
    }

    let stats = &report.time_to_new_high;
    md.push_str("## Time to New High\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    let _ = writeln!(md, "| Gaps | {} |", stats.gaps.len());
    let _ = writeln!(md, "| Min Days | {} |", days(stats.min_days));
    let _ = writeln!(md, "| Max Days | {} |", days(stats.max_days));
    let _ = writeln!(
        md,
        "| Median Days | {} |",
        stats
            .median_days
            .map_or_else(|| "-".to_string(), |d| format!("{d:.1}"))
    );
    let _ = writeln!(
        md,
        "| Gaps > {} Days | {} |",
        report.settings.significant_gap_days,
        report.significant_gaps.len()
    );
    md.push('\n');

    // Same cut-off as the significant-gap count above.
    if let Some(gap) = report
        .ongoing_gap
        .as_ref()
        .filter(|g| g.days > report.settings.significant_gap_days)
    {
        let _ = writeln!(
            md,
            "Last all-time high {:.2} on {}: {} days ago, now {:.2} ({}).\n",
            gap.last_ath_price,
            gap.last_ath_date,
            gap.days,
            gap.current_price,
            pct(gap.drawdown_pct)
        );
    }

    if !report.deep_drawdowns.is_empty() {
        let _ = writeln!(
            md,
            "## Deep Drawdowns (<= {})\n",
            pct(report.settings.deep_drawdown_threshold)
        );
        md.push_str("| Start | End | Days | Worst |\n");
        md.push_str("| --- | --- | --- | --- |\n");
        for p in &report.deep_drawdowns {
            let end = if p.ongoing {
                format!("{} (ongoing)", p.end_date)
            } else {
                p.end_date.to_string()
            };
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} |",
                p.start_date,
                end,
                p.calendar_days(),
                pct(p.worst_pct)
            );
        }
        md.push('\n');
    }

    md
}

/// One-row-per-symbol comparison table.
pub fn generate_summary_table(reports: &[AnalysisReport]) -> String {
    let mut md = String::with_capacity(256 + reports.len() * 128);
    md.push_str("| Symbol | Period | Current DD | Max DD | Episodes | Crashes | Bear Markets | Corrections | Days Since ATH |\n");
    md.push_str("| --- | --- | --- | --- | --- | --- | --- | --- | --- |\n");
    for r in reports {
        let count = |label: Label| r.episodes.iter().filter(|c| c.label == label).count();
        let _ = writeln!(
            md,
            "| {}{} | {} to {} | {} | {} | {} | {} | {} | {} | {} |",
            r.symbol,
            if r.is_synthetic() { " (synthetic)" } else { "" },
            r.first_date,
            r.last_date,
            pct(r.current_drawdown_pct),
            pct(r.max_drawdown_pct),
            r.episodes.len(),
            count(Label::Crash),
            count(Label::BearMarket),
            count(Label::Correction),
            r.ongoing_gap.as_ref().map_or(0, |g| g.days),
        );
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::data::DataSource;
    use crate::domain::PriceSeries;
    use chrono::NaiveDate;

    fn report(source: DataSource) -> AnalysisReport {
        report_with(source, &ReportConfig::default())
    }

    fn report_with(source: DataSource, settings: &ReportConfig) -> AnalysisReport {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let series = PriceSeries::from_pairs(
            [100.0, 120.0, 60.0, 90.0, 125.0, 70.0]
                .iter()
                .enumerate()
                .map(|(i, &p)| (start + chrono::Duration::days(i as i64), p)),
        )
        .unwrap();
        AnalysisReport::build("ABC.NS", source, &series, settings).unwrap()
    }

    #[test]
    fn report_has_sections() {
        let md = generate_report(&report(DataSource::CsvImport));
        assert!(md.contains("# Drawdown Report: ABC.NS"));
        assert!(md.contains("## Overview"));
        assert!(md.contains("## Deepest Drawdown"));
        assert!(md.contains("## Classification"));
        assert!(md.contains("## Episodes"));
        assert!(md.contains("## Time to New High"));
        assert!(md.contains("## Deep Drawdowns"));
        assert!(md.contains("(ongoing)"));
        assert!(md.contains("| Max Drawdown | -50.00% |"));
        assert!(!md.contains("SYNTHETIC"));
    }

    #[test]
    fn short_ongoing_gap_is_not_called_out() {
        // Last ATH on 01-05, series ends 01-06: one day.
        let r = report(DataSource::CsvImport);
        assert_eq!(r.ongoing_gap.as_ref().unwrap().days, 1);
        assert!(!generate_report(&r).contains("Last all-time high"));

        let settings = ReportConfig {
            significant_gap_days: 0,
            ..ReportConfig::default()
        };
        let md = generate_report(&report_with(DataSource::CsvImport, &settings));
        assert!(md.contains("Last all-time high 125.00 on 2020-01-05: 1 days ago"));
    }

    #[test]
    fn synthetic_data_is_flagged() {
        let r = report(DataSource::Synthetic);
        assert!(generate_report(&r).contains("**SYNTHETIC**"));
        assert!(generate_summary_table(&[r]).contains("ABC.NS (synthetic)"));
    }

    #[test]
    fn summary_table_row_per_report() {
        let table = generate_summary_table(&[
            report(DataSource::CsvImport),
            report(DataSource::CsvImport),
        ]);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("| 2 | 2 | 0 | 0 | 1 |"));
    }
}
