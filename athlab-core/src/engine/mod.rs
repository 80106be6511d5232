//! Drawdown engine: a single forward pass over a validated price series.
//!
//! Produces the ordered drawdown episodes and the all-time-high events, plus
//! the underwater curve used by the report layer.

pub mod drawdown;
pub mod episode;
pub mod underwater;

pub use drawdown::{analyze, DrawdownEngine};
pub use episode::{AllTimeHighEvent, Analysis, DrawdownEpisode, EpisodeStatus};
pub use underwater::{deep_drawdown_periods, underwater_curve, DeepDrawdownPeriod, UnderwaterPoint};
