//! Single-pass drawdown/recovery scan.
//!
//! Episode lifecycle:
//!
//! ```text
//! NoEpisode --(price < running peak)--> Open
//! Open --(price < trough)--> Open (trough moves)
//! Open --(price >= peak_price)--> Closed
//! Open --(end of series)--> Unresolved
//! ```
//!
//! Tie-breaks:
//! - recovery is non-strict: a print exactly at `peak_price` closes the episode
//! - the trough only moves on a strictly lower price (first-seen wins)
//! - an ATH event needs a strictly higher price; an exact repeat of the peak
//!   emits nothing but moves the running peak date forward

use super::episode::{AllTimeHighEvent, Analysis, DrawdownEpisode};
use crate::domain::{Observation, PriceSeries};
use chrono::NaiveDate;

/// Stateless entry point; all state lives in a per-call [`ScanState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawdownEngine;

impl DrawdownEngine {
    pub fn analyze(&self, series: &PriceSeries) -> Analysis {
        analyze(series)
    }
}

/// Scan `series` once and return its episodes and all-time-high events.
///
/// O(n) time; the only allocations are the two output vectors.
pub fn analyze(series: &PriceSeries) -> Analysis {
    let mut state = ScanState::new(series.first());

    for (index, obs) in series.iter().enumerate().skip(1) {
        state.step(index, obs);
    }

    let analysis = state.finish();
    log::debug!(
        "analyzed {} observations: {} episodes ({} unresolved), {} ATH events",
        series.len(),
        analysis.episodes.len(),
        analysis.episodes.iter().filter(|e| !e.is_resolved()).count(),
        analysis.ath_events.len(),
    );
    analysis
}

/// An episode that has opened but not yet closed.
#[derive(Debug, Clone)]
struct OpenEpisode {
    peak_index: usize,
    peak_date: NaiveDate,
    peak_price: f64,
    start_index: usize,
    start_date: NaiveDate,
    trough_index: usize,
    trough_date: NaiveDate,
    trough_price: f64,
}

impl OpenEpisode {
    fn into_episode(self, recovery: Option<(usize, NaiveDate)>) -> DrawdownEpisode {
        let depth_pct = (self.trough_price - self.peak_price) / self.peak_price;
        DrawdownEpisode {
            peak_index: self.peak_index,
            peak_date: self.peak_date,
            peak_price: self.peak_price,
            start_index: self.start_index,
            start_date: self.start_date,
            trough_index: self.trough_index,
            trough_date: self.trough_date,
            trough_price: self.trough_price,
            recovery_index: recovery.map(|(i, _)| i),
            recovery_date: recovery.map(|(_, d)| d),
            depth_pct,
            duration_to_trough: (self.trough_date - self.peak_date).num_days(),
            duration_to_recovery: recovery.map(|(_, d)| (d - self.peak_date).num_days()),
        }
    }
}

#[derive(Debug, Clone)]
enum EpisodeState {
    NoEpisode,
    Open(OpenEpisode),
}

struct ScanState {
    running_peak: f64,
    running_peak_index: usize,
    running_peak_date: NaiveDate,
    episode: EpisodeState,
    episodes: Vec<DrawdownEpisode>,
    ath_events: Vec<AllTimeHighEvent>,
}

impl ScanState {
    fn new(first: &Observation) -> Self {
        Self {
            running_peak: first.price,
            running_peak_index: 0,
            running_peak_date: first.date,
            episode: EpisodeState::NoEpisode,
            episodes: Vec::new(),
            ath_events: vec![AllTimeHighEvent {
                index: 0,
                date: first.date,
                price: first.price,
                days_since_previous: None,
            }],
        }
    }

    fn step(&mut self, index: usize, obs: &Observation) {
        if obs.price > self.running_peak {
            self.close_if_recovered(index, obs);
            self.record_new_high(index, obs);
        } else if obs.price < self.running_peak {
            self.extend_drawdown(index, obs);
        } else {
            self.close_if_recovered(index, obs);
            self.running_peak_index = index;
            self.running_peak_date = obs.date;
        }
    }

    /// Close the open episode if `obs` is back at or above its own peak level.
    fn close_if_recovered(&mut self, index: usize, obs: &Observation) {
        let recovered = match &self.episode {
            EpisodeState::Open(open) => obs.price >= open.peak_price,
            EpisodeState::NoEpisode => false,
        };
        if !recovered {
            return;
        }
        if let EpisodeState::Open(open) =
            std::mem::replace(&mut self.episode, EpisodeState::NoEpisode)
        {
            self.episodes.push(open.into_episode(Some((index, obs.date))));
        }
    }

    fn record_new_high(&mut self, index: usize, obs: &Observation) {
        let days_since_previous = self
            .ath_events
            .last()
            .map(|prev| (obs.date - prev.date).num_days());
        self.ath_events.push(AllTimeHighEvent {
            index,
            date: obs.date,
            price: obs.price,
            days_since_previous,
        });
        self.running_peak = obs.price;
        self.running_peak_index = index;
        self.running_peak_date = obs.date;
    }

    fn extend_drawdown(&mut self, index: usize, obs: &Observation) {
        if let EpisodeState::Open(open) = &mut self.episode {
            if obs.price < open.trough_price {
                open.trough_index = index;
                open.trough_date = obs.date;
                open.trough_price = obs.price;
            }
            return;
        }
        self.episode = EpisodeState::Open(OpenEpisode {
            peak_index: self.running_peak_index,
            peak_date: self.running_peak_date,
            peak_price: self.running_peak,
            start_index: index,
            start_date: obs.date,
            trough_index: index,
            trough_date: obs.date,
            trough_price: obs.price,
        });
    }

    fn finish(mut self) -> Analysis {
        if let EpisodeState::Open(open) =
            std::mem::replace(&mut self.episode, EpisodeState::NoEpisode)
        {
            self.episodes.push(open.into_episode(None));
        }
        Analysis {
            episodes: self.episodes,
            ath_events: self.ath_events,
        }
    }
}
