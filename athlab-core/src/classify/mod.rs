//! Correction classification and time-to-new-high statistics.

pub mod ath_stats;
pub mod classifier;
pub mod label;

pub use ath_stats::{ongoing_gap, time_to_new_high_stats, AthGap, OngoingGap, TimeToNewHighStats};
pub use classifier::{
    classify, summarize_labels, validate_episodes, ClassifiedEpisode, CorrectionClassifier,
    InvariantViolation, LabelSummary,
};
pub use label::{Label, BEAR_MARKET_THRESHOLD, CORRECTION_THRESHOLD, CRASH_THRESHOLD};
