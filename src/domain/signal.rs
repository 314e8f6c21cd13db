//! Composite decision score and its mapping to a trading signal.

use crate::domain::stock::StockRecord;
use serde::Serialize;
use std::fmt;

pub const WEIGHT_CHANGE_365D: f64 = 0.5;
pub const WEIGHT_CHANGE_30D: f64 = 0.3;
pub const WEIGHT_VOLUME: f64 = 0.2;

/// Scores strictly above this are BUY.
pub const BUY_THRESHOLD: f64 = 0.15;
/// Scores strictly below this are SELL.
pub const SELL_THRESHOLD: f64 = -0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn classify(score: f64) -> Self {
        if score > BUY_THRESHOLD {
            Signal::Buy
        } else if score < SELL_THRESHOLD {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 0.5 * yearly change + 0.3 * monthly change (both as fractions)
/// + 0.2 * (volume_ratio - 1)
pub fn decision_score(record: &StockRecord) -> f64 {
    WEIGHT_CHANGE_365D * record.change_365d / 100.0
        + WEIGHT_CHANGE_30D * record.change_30d / 100.0
        + WEIGHT_VOLUME * (record.volume_ratio - 1.0)
}
