//! Correction classifier: labels episodes by depth and checks the episode
//! sequence contract on the way in.

use super::label::Label;
use crate::engine::DrawdownEpisode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative tolerance when re-deriving `depth_pct` from peak and trough prices.
const DEPTH_TOLERANCE: f64 = 1e-9;

/// Internal contract breach in the input to the classifier.
///
/// These never occur for output of `engine::analyze`; seeing one means the
/// caller built or edited an episode list by hand.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("episode {index} starts on {start_date}, not after previous recovery on {previous_recovery}")]
    OverlappingEpisodes {
        index: usize,
        start_date: NaiveDate,
        previous_recovery: NaiveDate,
    },

    #[error("episode {index} is unresolved but is followed by another episode")]
    UnresolvedBeforeEnd { index: usize },

    #[error("episode {index} has inconsistent dates: {reason}")]
    InconsistentDates { index: usize, reason: &'static str },

    #[error("episode {index} has depth {depth_pct} inconsistent with its peak and trough")]
    InvalidDepth { index: usize, depth_pct: f64 },

    #[error("ATH event {index} on {date} is not after previous event on {previous}")]
    AthOutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("ATH event {index} price {price} does not exceed previous high {previous}")]
    AthNotIncreasing {
        index: usize,
        price: f64,
        previous: f64,
    },
}

/// An episode paired with its severity label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEpisode {
    #[serde(flatten)]
    pub episode: DrawdownEpisode,
    pub label: Label,
}

/// Stateless classifier; thresholds are the fixed constants in [`super::label`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectionClassifier;

impl CorrectionClassifier {
    pub fn classify(
        &self,
        episodes: &[DrawdownEpisode],
    ) -> Result<Vec<ClassifiedEpisode>, InvariantViolation> {
        classify(episodes)
    }
}

/// Attach a label to every episode, in order.
///
/// Unresolved episodes are labeled by the worst depth reached so far.
pub fn classify(episodes: &[DrawdownEpisode]) -> Result<Vec<ClassifiedEpisode>, InvariantViolation> {
    validate_episodes(episodes)?;
    Ok(episodes
        .iter()
        .map(|episode| ClassifiedEpisode {
            label: Label::from_depth(episode.depth_pct),
            episode: episode.clone(),
        })
        .collect())
}

/// Check ordering, non-overlap and per-episode consistency.
pub fn validate_episodes(episodes: &[DrawdownEpisode]) -> Result<(), InvariantViolation> {
    for (index, ep) in episodes.iter().enumerate() {
        check_episode(index, ep)?;

        if index > 0 {
            let prev = &episodes[index - 1];
            let previous_recovery = prev
                .recovery_date
                .ok_or(InvariantViolation::UnresolvedBeforeEnd { index: index - 1 })?;
            if ep.start_date <= previous_recovery || ep.peak_date < previous_recovery {
                return Err(InvariantViolation::OverlappingEpisodes {
                    index,
                    start_date: ep.start_date,
                    previous_recovery,
                });
            }
        }
    }
    Ok(())
}

fn check_episode(index: usize, ep: &DrawdownEpisode) -> Result<(), InvariantViolation> {
    let inconsistent = |reason| InvariantViolation::InconsistentDates { index, reason };

    if ep.start_date <= ep.peak_date {
        return Err(inconsistent("drawdown starts on or before its peak"));
    }
    if ep.trough_date < ep.start_date {
        return Err(inconsistent("trough precedes drawdown start"));
    }
    if let Some(recovery) = ep.recovery_date {
        if recovery <= ep.trough_date {
            return Err(inconsistent("recovery is not after the trough"));
        }
    }
    if ep.recovery_date.is_some() != ep.duration_to_recovery.is_some() {
        return Err(inconsistent("recovery date and recovery duration disagree"));
    }

    let expected = (ep.trough_price - ep.peak_price) / ep.peak_price;
    let depth_ok = ep.depth_pct.is_finite()
        && ep.depth_pct < 0.0
        && (ep.depth_pct - expected).abs() <= DEPTH_TOLERANCE * expected.abs().max(1.0);
    if !depth_ok {
        return Err(InvariantViolation::InvalidDepth {
            index,
            depth_pct: ep.depth_pct,
        });
    }
    Ok(())
}

/// Per-label aggregate over a classified episode list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSummary {
    pub label: Label,
    pub count: usize,
    pub unresolved: usize,
    pub worst_depth_pct: Option<f64>,
    /// Mean calendar days from peak to recovery over resolved episodes.
    pub mean_days_to_recovery: Option<f64>,
}

/// One row per label, mildest first; labels with no episodes have `count == 0`.
pub fn summarize_labels(classified: &[ClassifiedEpisode]) -> Vec<LabelSummary> {
    Label::ALL
        .iter()
        .map(|&label| {
            let members: Vec<&DrawdownEpisode> = classified
                .iter()
                .filter(|c| c.label == label)
                .map(|c| &c.episode)
                .collect();

            let recovery_days: Vec<i64> = members
                .iter()
                .filter_map(|ep| ep.duration_to_recovery)
                .collect();

            LabelSummary {
                label,
                count: members.len(),
                unresolved: members.iter().filter(|ep| !ep.is_resolved()).count(),
                worst_depth_pct: members
                    .iter()
                    .map(|ep| ep.depth_pct)
                    .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d)))),
                mean_days_to_recovery: if recovery_days.is_empty() {
                    None
                } else {
                    Some(recovery_days.iter().sum::<i64>() as f64 / recovery_days.len() as f64)
                },
            }
        })
        .collect()
}
