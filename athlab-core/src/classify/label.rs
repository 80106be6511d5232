//! Severity labels for drawdown episodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Drawdowns shallower than this are not material.
pub const CORRECTION_THRESHOLD: f64 = -0.10;
pub const BEAR_MARKET_THRESHOLD: f64 = -0.20;
pub const CRASH_THRESHOLD: f64 = -0.40;

/// Severity tier of a drawdown, a pure function of its depth.
///
/// | depth_pct            | label      |
/// |----------------------|------------|
/// | > −10%               | Other      |
/// | (−20%, −10%]         | Correction |
/// | (−40%, −20%]         | BearMarket |
/// | ≤ −40%               | Crash      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Other,
    Correction,
    BearMarket,
    Crash,
}

impl Label {
    /// All labels, mildest first.
    pub const ALL: [Label; 4] = [Label::Other, Label::Correction, Label::BearMarket, Label::Crash];

    pub fn from_depth(depth_pct: f64) -> Self {
        if depth_pct <= CRASH_THRESHOLD {
            Label::Crash
        } else if depth_pct <= BEAR_MARKET_THRESHOLD {
            Label::BearMarket
        } else if depth_pct <= CORRECTION_THRESHOLD {
            Label::Correction
        } else {
            Label::Other
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Label::Other => "Other",
            Label::Correction => "Correction",
            Label::BearMarket => "Bear market",
            Label::Crash => "Crash",
        }
    }

    /// Depth range covered by this label, as display text.
    pub fn range(&self) -> &'static str {
        match self {
            Label::Other => "> -10%",
            Label::Correction => "-10% to -20%",
            Label::BearMarket => "-20% to -40%",
            Label::Crash => "<= -40%",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
