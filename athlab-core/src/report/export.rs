//! Report persistence: JSON round-trip and CSV artifacts.
//!
//! An artifact directory holds:
//! - `report.json`: the full [`AnalysisReport`]
//! - `episodes.csv`: one row per classified episode
//! - `ath_gaps.csv`: one row per gap between consecutive all-time highs
//! - `underwater.csv`: per-date drawdown from the running high
//!
//! `report.json` carries `schema_version`; newer versions are rejected on load.

use super::{AnalysisReport, ReportError, SCHEMA_VERSION};
use crate::classify::{AthGap, ClassifiedEpisode};
use crate::engine::UnderwaterPoint;
use std::path::{Path, PathBuf};

pub fn export_json(report: &AnalysisReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Deserialize a report, rejecting schema versions newer than this build.
pub fn import_json(json: &str) -> Result<AnalysisReport, ReportError> {
    let report: AnalysisReport = serde_json::from_str(json)?;
    if report.schema_version > SCHEMA_VERSION {
        return Err(ReportError::UnsupportedSchema {
            found: report.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(report)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ReportError> {
    let data = wtr
        .into_inner()
        .map_err(|e| ReportError::Csv(e.into_error().into()))?;
    String::from_utf8(data).map_err(|_| ReportError::Encoding)
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Columns: label, peak_date, peak_price, start_date, trough_date,
/// trough_price, recovery_date, depth_pct, days_to_trough, days_to_recovery,
/// status
pub fn episodes_csv(episodes: &[ClassifiedEpisode]) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "label",
        "peak_date",
        "peak_price",
        "start_date",
        "trough_date",
        "trough_price",
        "recovery_date",
        "depth_pct",
        "days_to_trough",
        "days_to_recovery",
        "status",
    ])?;

    for c in episodes {
        let ep = &c.episode;
        wtr.write_record([
            c.label.name(),
            &ep.peak_date.to_string(),
            &format!("{:.6}", ep.peak_price),
            &ep.start_date.to_string(),
            &ep.trough_date.to_string(),
            &format!("{:.6}", ep.trough_price),
            &opt(ep.recovery_date),
            &format!("{:.4}", ep.depth_pct * 100.0),
            &ep.duration_to_trough.to_string(),
            &opt(ep.duration_to_recovery),
            &format!("{:?}", ep.status()),
        ])?;
    }

    finish(wtr)
}

pub fn ath_gaps_csv(gaps: &[AthGap]) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["from_date", "from_price", "to_date", "to_price", "days"])?;
    for g in gaps {
        wtr.write_record([
            &g.from_date.to_string(),
            &format!("{:.6}", g.from_price),
            &g.to_date.to_string(),
            &format!("{:.6}", g.to_price),
            &g.days.to_string(),
        ])?;
    }
    finish(wtr)
}

pub fn underwater_csv(curve: &[UnderwaterPoint]) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "price", "running_peak", "drawdown_pct"])?;
    for p in curve {
        wtr.write_record([
            &p.date.to_string(),
            &format!("{:.6}", p.price),
            &format!("{:.6}", p.running_peak),
            &format!("{:.4}", p.drawdown_pct * 100.0),
        ])?;
    }
    finish(wtr)
}

fn write_file(path: PathBuf, contents: &str) -> Result<(), ReportError> {
    std::fs::write(&path, contents).map_err(|source| ReportError::Io { path, source })
}

/// Write the artifact set into `output_dir/<symbol>/` and return that directory.
///
/// `underwater` is passed separately because it is not part of `report.json`.
pub fn save_artifacts(
    report: &AnalysisReport,
    underwater: &[UnderwaterPoint],
    output_dir: &Path,
) -> Result<PathBuf, ReportError> {
    let dir = output_dir.join(artifact_dir_name(&report.symbol));
    std::fs::create_dir_all(&dir).map_err(|source| ReportError::Io {
        path: dir.clone(),
        source,
    })?;

    write_file(dir.join("report.json"), &export_json(report)?)?;
    write_file(dir.join("episodes.csv"), &episodes_csv(&report.episodes)?)?;
    write_file(
        dir.join("ath_gaps.csv"),
        &ath_gaps_csv(&report.time_to_new_high.gaps)?,
    )?;
    write_file(dir.join("underwater.csv"), &underwater_csv(underwater)?)?;

    log::info!("{}: artifacts written to {}", report.symbol, dir.display());
    Ok(dir)
}

/// Load `report.json` from an artifact directory, or from a direct file path.
pub fn load_report(path: &Path) -> Result<AnalysisReport, ReportError> {
    let file = if path.is_dir() {
        path.join("report.json")
    } else {
        path.to_path_buf()
    };
    let json = std::fs::read_to_string(&file).map_err(|source| ReportError::Io {
        path: file.clone(),
        source,
    })?;
    import_json(&json)
}

/// `^NSEI` → `NSEI`; anything outside `[A-Za-z0-9._-]` becomes `_`. Names
/// made only of dots would escape the output directory and become `report`.
fn artifact_dir_name(symbol: &str) -> String {
    let name: String = symbol
        .trim_start_matches('^')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.chars().all(|c| c == '.') {
        "report".to_string()
    } else {
        name
    }
}
