//! Decision output: result record, tagged log lines and feature snapshot.

use crate::domain::signal::Signal;
use crate::domain::stock::StockRecord;
use std::fmt;

/// How a presentation layer should colour a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTone {
    Positive,
    Negative,
    Neutral,
}

impl LogTone {
    pub fn marker(&self) -> &'static str {
        match self {
            LogTone::Positive => "[+]",
            LogTone::Negative => "[-]",
            LogTone::Neutral => "[i]",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub tone: LogTone,
    pub text: String,
}

impl LogLine {
    pub fn positive(text: impl Into<String>) -> Self {
        Self {
            tone: LogTone::Positive,
            text: text.into(),
        }
    }

    pub fn negative(text: impl Into<String>) -> Self {
        Self {
            tone: LogTone::Negative,
            text: text.into(),
        }
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self {
            tone: LogTone::Neutral,
            text: text.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tone.marker(), self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionResult {
    pub symbol: String,
    pub ltp: f64,
    pub change_30d: f64,
    pub change_365d: f64,
    pub score: f64,
    pub signal: Signal,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub cumulative_return: f64,
    pub sharpe_ratio: f64,
    pub simulated_profit: f64,
    pub log: Vec<LogLine>,
}

/// Raw inputs behind a decision, for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSnapshot {
    pub symbol: String,
    pub ltp: f64,
    pub change_30d: f64,
    pub change_365d: f64,
    pub volume_lacs: f64,
    pub volume_ratio: f64,
    pub momentum_score: f64,
}

impl From<&StockRecord> for FeatureSnapshot {
    fn from(r: &StockRecord) -> Self {
        Self {
            symbol: r.symbol.clone(),
            ltp: r.ltp,
            change_30d: r.change_30d,
            change_365d: r.change_365d,
            volume_lacs: r.volume_lacs,
            volume_ratio: r.volume_ratio,
            momentum_score: r.momentum_score,
        }
    }
}

/// Format with a fixed number of decimals and comma thousands grouping,
/// e.g. `group_thousands(1234567.891, 2) == "1,234,567.89"`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}
