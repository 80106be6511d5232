//! Output types of the drawdown engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One excursion below a prior all-time high.
///
/// `depth_pct` is a fraction (−0.2 = 20% below the peak). Durations are
/// calendar days measured from the peak date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    pub peak_index: usize,
    pub peak_date: NaiveDate,
    pub peak_price: f64,
    /// First observation strictly below the peak.
    pub start_index: usize,
    pub start_date: NaiveDate,
    pub trough_index: usize,
    pub trough_date: NaiveDate,
    pub trough_price: f64,
    pub recovery_index: Option<usize>,
    pub recovery_date: Option<NaiveDate>,
    pub depth_pct: f64,
    pub duration_to_trough: i64,
    pub duration_to_recovery: Option<i64>,
}

/// Terminal state of an episode once the engine has finished with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeStatus {
    /// Price returned to the peak level on `recovery_date`.
    Recovered,
    /// The series ended before price returned to the peak level.
    Unresolved,
}

impl DrawdownEpisode {
    pub fn status(&self) -> EpisodeStatus {
        if self.recovery_date.is_some() {
            EpisodeStatus::Recovered
        } else {
            EpisodeStatus::Unresolved
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.recovery_date.is_some()
    }

    /// Calendar days from trough back up to the peak level.
    pub fn duration_trough_to_recovery(&self) -> Option<i64> {
        self.recovery_date.map(|r| (r - self.trough_date).num_days())
    }

    /// Number of observations spent strictly below the peak.
    ///
    /// For an unresolved episode this is measured up to `series_len`.
    pub fn underwater_observations(&self, series_len: usize) -> usize {
        self.recovery_index.unwrap_or(series_len) - self.start_index
    }

    /// Whether observation `index` falls in this episode's underwater span.
    pub fn covers_index(&self, index: usize) -> bool {
        index >= self.start_index && self.recovery_index.map_or(true, |r| index < r)
    }
}

/// A date on which price printed a strict new running high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllTimeHighEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub price: f64,
    /// Calendar days since the previous event; `None` for the first one.
    pub days_since_previous: Option<i64>,
}

/// Everything a single `analyze` pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub episodes: Vec<DrawdownEpisode>,
    pub ath_events: Vec<AllTimeHighEvent>,
}

impl Analysis {
    /// The episode with the most negative depth (earliest on ties).
    pub fn deepest_episode(&self) -> Option<&DrawdownEpisode> {
        self.episodes.iter().fold(None, |worst, ep| match worst {
            Some(w) if w.depth_pct <= ep.depth_pct => Some(w),
            _ => Some(ep),
        })
    }

    /// The trailing unresolved episode, if the series ended under water.
    pub fn open_episode(&self) -> Option<&DrawdownEpisode> {
        self.episodes.last().filter(|ep| !ep.is_resolved())
    }

    pub fn last_ath(&self) -> Option<&AllTimeHighEvent> {
        self.ath_events.last()
    }
}
