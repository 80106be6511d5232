//! Per-observation drawdown from the running all-time high ("underwater" curve)
//! and the threshold-crossing periods derived from it.

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Drawdown state on a single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwaterPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub running_peak: f64,
    /// (price − running_peak) / running_peak; 0.0 on any print at the peak level.
    pub drawdown_pct: f64,
}

/// Underwater curve for the whole series. Same length as `series`.
pub fn underwater_curve(series: &PriceSeries) -> Vec<UnderwaterPoint> {
    let mut running_peak = series.first().price;
    series
        .iter()
        .map(|obs| {
            running_peak = running_peak.max(obs.price);
            UnderwaterPoint {
                date: obs.date,
                price: obs.price,
                running_peak,
                drawdown_pct: (obs.price - running_peak) / running_peak,
            }
        })
        .collect()
}

/// A maximal span during which the underwater value stayed at or below a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepDrawdownPeriod {
    pub start_index: usize,
    pub start_date: NaiveDate,
    /// First observation back above the threshold, or the last observation
    /// when `ongoing`.
    pub end_index: usize,
    pub end_date: NaiveDate,
    pub worst_pct: f64,
    pub ongoing: bool,
}

impl DeepDrawdownPeriod {
    pub fn calendar_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Spans where drawdown ≤ `threshold` (a negative fraction, e.g. −0.25).
pub fn deep_drawdown_periods(series: &PriceSeries, threshold: f64) -> Vec<DeepDrawdownPeriod> {
    let curve = underwater_curve(series);
    let mut periods = Vec::new();
    let mut current: Option<DeepDrawdownPeriod> = None;

    for (index, point) in curve.iter().enumerate() {
        if point.drawdown_pct <= threshold {
            match current.as_mut() {
                Some(period) => period.worst_pct = period.worst_pct.min(point.drawdown_pct),
                None => {
                    current = Some(DeepDrawdownPeriod {
                        start_index: index,
                        start_date: point.date,
                        end_index: index,
                        end_date: point.date,
                        worst_pct: point.drawdown_pct,
                        ongoing: true,
                    })
                }
            }
        } else if let Some(mut period) = current.take() {
            period.end_index = index;
            period.end_date = point.date;
            period.ongoing = false;
            periods.push(period);
        }
    }

    if let Some(mut period) = current {
        let last = curve.len() - 1;
        period.end_index = last;
        period.end_date = curve[last].date;
        periods.push(period);
    }

    periods
}
