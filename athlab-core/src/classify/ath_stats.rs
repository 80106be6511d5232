//! Time-to-new-high statistics over the all-time-high event sequence.

use super::classifier::InvariantViolation;
use crate::domain::PriceSeries;
use crate::engine::AllTimeHighEvent;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wait between two consecutive all-time highs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthGap {
    pub from_date: NaiveDate,
    pub from_price: f64,
    pub to_date: NaiveDate,
    pub to_price: f64,
    pub days: i64,
}

/// Gap list plus aggregates. Aggregates are `None` with fewer than two events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeToNewHighStats {
    pub gaps: Vec<AthGap>,
    pub min_days: Option<i64>,
    pub max_days: Option<i64>,
    pub median_days: Option<f64>,
}

impl TimeToNewHighStats {
    /// Gaps strictly longer than `min_days`.
    pub fn significant(&self, min_days: i64) -> Vec<&AthGap> {
        self.gaps.iter().filter(|g| g.days > min_days).collect()
    }

    pub fn longest(&self) -> Option<&AthGap> {
        self.gaps.iter().max_by_key(|g| g.days)
    }
}

/// Gap in calendar days for every adjacent pair of events, with min/max/median.
///
/// Fails if the events are not strictly increasing in both date and price.
pub fn time_to_new_high_stats(
    ath_events: &[AllTimeHighEvent],
) -> Result<TimeToNewHighStats, InvariantViolation> {
    let mut gaps = Vec::with_capacity(ath_events.len().saturating_sub(1));

    for (offset, pair) in ath_events.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        let index = offset + 1;
        if next.date <= prev.date {
            return Err(InvariantViolation::AthOutOfOrder {
                index,
                date: next.date,
                previous: prev.date,
            });
        }
        if next.price <= prev.price {
            return Err(InvariantViolation::AthNotIncreasing {
                index,
                price: next.price,
                previous: prev.price,
            });
        }
        gaps.push(AthGap {
            from_date: prev.date,
            from_price: prev.price,
            to_date: next.date,
            to_price: next.price,
            days: (next.date - prev.date).num_days(),
        });
    }

    let mut days: Vec<i64> = gaps.iter().map(|g| g.days).collect();
    days.sort_unstable();

    Ok(TimeToNewHighStats {
        min_days: days.first().copied(),
        max_days: days.last().copied(),
        median_days: median(&days),
        gaps,
    })
}

/// Median of a sorted slice; mean of the middle pair for even lengths.
fn median(sorted: &[i64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2] as f64),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0),
    }
}

/// Time elapsed since the most recent all-time high, when the series does not
/// end on one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OngoingGap {
    pub last_ath_date: NaiveDate,
    pub last_ath_price: f64,
    pub as_of: NaiveDate,
    pub current_price: f64,
    pub days: i64,
    /// (current_price − last_ath_price) / last_ath_price.
    pub drawdown_pct: f64,
}

pub fn ongoing_gap(series: &PriceSeries, ath_events: &[AllTimeHighEvent]) -> Option<OngoingGap> {
    let last_ath = ath_events.last()?;
    let last = series.last();
    if last.date <= last_ath.date {
        return None;
    }
    Some(OngoingGap {
        last_ath_date: last_ath.date,
        last_ath_price: last_ath.price,
        as_of: last.date,
        current_price: last.price,
        days: (last.date - last_ath.date).num_days(),
        drawdown_pct: (last.price - last_ath.price) / last_ath.price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, m, day).unwrap()
    }

    fn event(date: NaiveDate, price: f64) -> AllTimeHighEvent {
        AllTimeHighEvent {
            index: 0,
            date,
            price,
            days_since_previous: None,
        }
    }

    #[test]
    fn fewer_than_two_events_has_no_aggregates() {
        let stats = time_to_new_high_stats(&[event(d(1, 1), 10.0)]).unwrap();
        assert!(stats.gaps.is_empty());
        assert_eq!(stats.min_days, None);
        assert_eq!(stats.max_days, None);
        assert_eq!(stats.median_days, None);

        let empty = time_to_new_high_stats(&[]).unwrap();
        assert!(empty.gaps.is_empty());
    }

    #[test]
    fn odd_gap_count_median() {
        let events = [
            event(d(1, 1), 10.0),
            event(d(1, 11), 11.0), // 10 days
            event(d(1, 13), 12.0), // 2 days
            event(d(2, 12), 13.0), // 30 days
        ];
        let stats = time_to_new_high_stats(&events).unwrap();
        assert_eq!(stats.gaps.len(), 3);
        assert_eq!(stats.min_days, Some(2));
        assert_eq!(stats.max_days, Some(30));
        assert_eq!(stats.median_days, Some(10.0));
        assert_eq!(stats.longest().unwrap().to_date, d(2, 12));
    }

    #[test]
    fn even_gap_count_median_is_mean_of_middle() {
        let events = [
            event(d(1, 1), 10.0),
            event(d(1, 2), 11.0),  // 1
            event(d(1, 5), 12.0),  // 3
        ];
        let stats = time_to_new_high_stats(&events).unwrap();
        assert_eq!(stats.median_days, Some(2.0));
    }

    #[test]
    fn significant_filter_is_strict() {
        let events = [
            event(d(1, 1), 10.0),
            event(d(1, 31), 11.0), // 30 days
            event(d(3, 3), 12.0),  // 31 days
        ];
        let stats = time_to_new_high_stats(&events).unwrap();
        let sig = stats.significant(30);
        assert_eq!(sig.len(), 1);
        assert_eq!(sig[0].days, 31);
    }

    #[test]
    fn rejects_out_of_order_events() {
        let events = [event(d(2, 1), 10.0), event(d(1, 1), 11.0)];
        assert!(matches!(
            time_to_new_high_stats(&events).unwrap_err(),
            InvariantViolation::AthOutOfOrder { index: 1, .. }
        ));
    }

    #[test]
    fn rejects_non_increasing_prices() {
        let events = [event(d(1, 1), 10.0), event(d(1, 2), 10.0)];
        assert!(matches!(
            time_to_new_high_stats(&events).unwrap_err(),
            InvariantViolation::AthNotIncreasing { index: 1, .. }
        ));
    }

    #[test]
    fn ongoing_gap_measured_to_series_end() {
        let series = PriceSeries::from_pairs(vec![
            (d(1, 1), 100.0),
            (d(1, 5), 120.0),
            (d(3, 6), 90.0),
        ])
        .unwrap();
        let analysis = analyze(&series);
        let gap = ongoing_gap(&series, &analysis.ath_events).unwrap();
        assert_eq!(gap.last_ath_date, d(1, 5));
        assert_eq!(gap.as_of, d(3, 6));
        assert_eq!(gap.days, 60);
        assert!((gap.drawdown_pct - (-0.25)).abs() < 1e-12);
    }

    #[test]
    fn no_ongoing_gap_when_series_ends_on_high() {
        let series = PriceSeries::from_pairs(vec![(d(1, 1), 100.0), (d(1, 2), 101.0)]).unwrap();
        let analysis = analyze(&series);
        assert_eq!(ongoing_gap(&series, &analysis.ath_events), None);
    }
}
