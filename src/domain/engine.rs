//! Signal and single-period backtest engine.
//!
//! One engine wraps one prepared [`Dataset`] and an initial capital. Every
//! call to [`DecisionEngine::decide`] is a pure function of those two values
//! and the requested symbol.

use crate::domain::dataset::Dataset;
use crate::domain::decision::{group_thousands, DecisionResult, FeatureSnapshot, LogLine};
use crate::domain::error::SnaptraderError;
use crate::domain::metrics::reported_sharpe;
use crate::domain::signal::{decision_score, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Share of capital committed on a BUY.
pub const BUY_ALLOCATION: f64 = 0.2;

const CURRENCY: &str = "₹";

/// Run parameters resolved from config file and command line.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub initial_capital: f64,
    pub default_symbol: Option<String>,
    pub data_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DecisionEngine {
    dataset: Arc<Dataset>,
    initial_capital: f64,
}

struct Outcome {
    simulated_profit: f64,
    final_capital: f64,
    cumulative_return: f64,
    log: Vec<LogLine>,
}

impl DecisionEngine {
    pub fn new(dataset: Arc<Dataset>, initial_capital: f64) -> Result<Self, SnaptraderError> {
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(SnaptraderError::ConfigInvalid {
                section: "engine".into(),
                key: "initial_capital".into(),
                reason: format!("initial_capital must be a positive number, got {initial_capital}"),
            });
        }
        Ok(Self {
            dataset,
            initial_capital,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn features(&self, symbol: &str) -> Result<FeatureSnapshot, SnaptraderError> {
        self.dataset.lookup(symbol).map(FeatureSnapshot::from)
    }

    pub fn decide(&self, symbol: &str) -> Result<DecisionResult, SnaptraderError> {
        let record = self.dataset.lookup(symbol)?;

        let score = decision_score(record);
        let signal = Signal::classify(score);
        let hyp_return = record.change_30d / 100.0;
        let score_text = group_thousands(score, 4);

        let outcome = match signal {
            Signal::Buy => {
                if record.ltp <= 0.0 {
                    return Err(SnaptraderError::malformed(format!(
                        "cannot size a BUY for '{}': LTP must be positive, got {}",
                        record.symbol, record.ltp
                    )));
                }
                let shares_to_buy = (self.initial_capital * BUY_ALLOCATION / record.ltp).floor();
                let investment = shares_to_buy * record.ltp;
                let simulated_profit = investment * hyp_return;
                Outcome {
                    simulated_profit,
                    final_capital: self.initial_capital + simulated_profit,
                    cumulative_return: simulated_profit / self.initial_capital,
                    log: vec![
                        LogLine::positive(format!(
                            "BUY signal triggered by decision score {score_text}."
                        )),
                        LogLine::positive(format!(
                            "Shares purchased: {}. Initial investment: {CURRENCY} {}.",
                            shares_to_buy as u64,
                            group_thousands(investment, 2)
                        )),
                        LogLine::positive(format!(
                            "Simulated profit (30-day return as proxy): {CURRENCY} {}.",
                            group_thousands(simulated_profit, 2)
                        )),
                    ],
                }
            }
            Signal::Sell => {
                let decision = if hyp_return < 0.0 && score < 0.0 {
                    LogLine::negative("Decision: hold cash. Risk managed: avoided a potential loss.")
                } else {
                    LogLine::neutral("Decision: hold cash (neutral stance).")
                };
                self.flat_outcome(vec![
                    LogLine::negative(format!(
                        "SELL signal triggered by decision score {score_text}."
                    )),
                    decision,
                ])
            }
            Signal::Hold => self.flat_outcome(vec![
                LogLine::neutral(format!(
                    "HOLD signal triggered by decision score {score_text}."
                )),
                LogLine::neutral("Decision: hold cash (waiting for clearer trend)."),
            ]),
        };

        info!(
            symbol,
            score,
            signal = signal.as_str(),
            profit = outcome.simulated_profit,
            "decision computed"
        );

        Ok(DecisionResult {
            symbol: record.symbol.clone(),
            ltp: record.ltp,
            change_30d: record.change_30d,
            change_365d: record.change_365d,
            score,
            signal,
            initial_capital: self.initial_capital,
            final_capital: outcome.final_capital,
            cumulative_return: outcome.cumulative_return,
            sharpe_ratio: reported_sharpe(outcome.cumulative_return),
            simulated_profit: outcome.simulated_profit,
            log: outcome.log,
        })
    }

    /// Decide each symbol in order. A missing symbol fails only its own entry.
    pub fn decide_all<'s>(
        &self,
        symbols: &'s [String],
    ) -> Vec<(&'s str, Result<DecisionResult, SnaptraderError>)> {
        symbols
            .iter()
            .map(|s| {
                let result = self.decide(s);
                if let Err(e) = &result {
                    warn!(symbol = s.as_str(), error = %e, "decision skipped");
                }
                (s.as_str(), result)
            })
            .collect()
    }

    /// No position is opened; shorting is not modelled.
    fn flat_outcome(&self, log: Vec<LogLine>) -> Outcome {
        Outcome {
            simulated_profit: 0.0,
            final_capital: self.initial_capital,
            cumulative_return: 0.0,
            log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::LogTone;
    use crate::domain::prepare::prepare;
    use crate::domain::stock::{RawTable, REQUIRED_COLUMNS};
    use approx::assert_relative_eq;

    fn row(symbol: &str, ltp: &str, c30: &str, c365: &str, vol: &str) -> Vec<String> {
        vec![
            symbol, "1", "1", "1", ltp, "1", "1", "1", c30, c365, vol,
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn engine(rows: Vec<Vec<String>>, capital: f64) -> DecisionEngine {
        let headers = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let ds = prepare(&RawTable::new(headers, rows)).unwrap();
        DecisionEngine::new(Arc::new(ds), capital).unwrap()
    }

    fn tones(result: &DecisionResult) -> Vec<LogTone> {
        result.log.iter().map(|l| l.tone).collect()
    }

    #[test]
    fn buy_path_sizes_position_from_capital() {
        // score = 0.5*0.30 + 0.3*0.10 + 0 = 0.18
        let e = engine(vec![row("RELIANCE", "2,500", "10", "30", "5")], 1_000_000.0);
        let r = e.decide("RELIANCE").unwrap();

        assert_eq!(r.signal, Signal::Buy);
        assert_relative_eq!(r.score, 0.18, epsilon = 1e-12);
        assert_relative_eq!(r.simulated_profit, 20_000.0, epsilon = 1e-6);
        assert_relative_eq!(r.final_capital, 1_020_000.0, epsilon = 1e-6);
        assert_relative_eq!(r.cumulative_return, 0.02, epsilon = 1e-12);
        assert_relative_eq!(r.sharpe_ratio, (0.02 - 0.05 / 252.0) / 0.1, epsilon = 1e-12);
        assert_eq!(tones(&r), vec![LogTone::Positive; 3]);
        assert!(r.log[0].text.contains("0.1800"));
        assert!(r.log[1].text.contains("Shares purchased: 80."));
        assert!(r.log[1].text.contains("200,000.00"));
        assert!(r.log[2].text.contains("20,000.00"));
    }

    #[test]
    fn buy_on_non_positive_ltp_fails_only_that_symbol() {
        let e = engine(
            vec![
                row("ZERO", "0", "10", "30", "5"),
                row("FLAT", "0", "1", "1", "5"),
                row("OK", "2,500", "10", "30", "5"),
            ],
            1_000_000.0,
        );
        assert!(matches!(
            e.decide("ZERO"),
            Err(SnaptraderError::MalformedInput { .. })
        ));
        assert_eq!(e.decide("FLAT").unwrap().signal, Signal::Hold);
        assert_eq!(e.decide("OK").unwrap().signal, Signal::Buy);
    }

    #[test]
    fn buy_share_count_is_floored() {
        // 0.2 * 100_000 / 3_000 = 6.67 -> 6 shares
        let e = engine(vec![row("A", "3000", "10", "30", "5")], 100_000.0);
        let r = e.decide("A").unwrap();
        assert_eq!(r.signal, Signal::Buy);
        assert_relative_eq!(r.simulated_profit, 6.0 * 3000.0 * 0.1, epsilon = 1e-9);
    }

    #[test]
    fn buy_with_negative_month_loses_money_and_clamps_sharpe() {
        // score = 0.5*0.60 + 0.3*-0.05 = 0.285
        let e = engine(vec![row("A", "100", "-5", "60", "5")], 1_000_000.0);
        let r = e.decide("A").unwrap();
        assert_eq!(r.signal, Signal::Buy);
        assert!(r.simulated_profit < 0.0);
        assert!(r.cumulative_return < 0.0);
        assert_eq!(r.sharpe_ratio, 0.0);
    }

    #[test]
    fn sell_path_avoids_loss() {
        // score = 0.5*-0.40 + 0.3*-0.10 = -0.23
        let e = engine(vec![row("A", "100", "-10", "-40", "5")], 1_000_000.0);
        let r = e.decide("A").unwrap();
        assert_eq!(r.signal, Signal::Sell);
        assert_eq!(r.simulated_profit, 0.0);
        assert_eq!(r.final_capital, 1_000_000.0);
        assert_eq!(r.cumulative_return, 0.0);
        assert_eq!(r.sharpe_ratio, 0.0);
        assert_eq!(tones(&r), vec![LogTone::Negative, LogTone::Negative]);
        assert!(r.log[1].text.contains("Risk managed"));
    }

    #[test]
    fn sell_path_with_positive_month_is_neutral() {
        // score = 0.5*-0.50 + 0.3*0.10 = -0.22
        let e = engine(vec![row("A", "100", "10", "-50", "5")], 1_000_000.0);
        let r = e.decide("A").unwrap();
        assert_eq!(r.signal, Signal::Sell);
        assert_eq!(r.simulated_profit, 0.0);
        assert_eq!(tones(&r), vec![LogTone::Negative, LogTone::Neutral]);
        assert!(r.log[1].text.contains("neutral stance"));
    }

    #[test]
    fn hold_path_waits() {
        let e = engine(vec![row("A", "100", "25", "5", "5")], 500_000.0);
        let r = e.decide("A").unwrap();
        assert_eq!(r.signal, Signal::Hold);
        assert_eq!(r.simulated_profit, 0.0);
        assert_eq!(r.final_capital, 500_000.0);
        assert_eq!(r.sharpe_ratio, 0.0);
        assert_eq!(tones(&r), vec![LogTone::Neutral, LogTone::Neutral]);
        assert!(r.log[1].text.contains("waiting for clearer trend"));
    }

    #[test]
    fn volume_ratio_moves_the_score() {
        // A: ratio 1.8 -> +0.16 ; B: ratio 0.2 -> -0.16
        let e = engine(
            vec![row("A", "100", "0", "0", "9"), row("B", "100", "0", "0", "1")],
            1_000_000.0,
        );
        assert_eq!(e.decide("A").unwrap().signal, Signal::Buy);
        assert_eq!(e.decide("B").unwrap().signal, Signal::Sell);
    }

    #[test]
    fn unknown_symbol_is_error_and_engine_stays_usable() {
        let e = engine(vec![row("A", "100", "1", "1", "1")], 1_000_000.0);
        assert!(matches!(
            e.decide("ZZZ").unwrap_err(),
            SnaptraderError::SymbolNotFound { symbol } if symbol == "ZZZ"
        ));
        assert!(e.decide("A").is_ok());
    }

    #[test]
    fn decide_is_repeatable() {
        let e = engine(vec![row("A", "2,500", "10", "30", "5")], 1_000_000.0);
        assert_eq!(e.decide("A").unwrap(), e.decide("A").unwrap());
    }

    #[test]
    fn decide_all_keeps_order_and_isolates_failures() {
        let e = engine(
            vec![row("A", "100", "1", "1", "1"), row("B", "100", "1", "1", "1")],
            1_000_000.0,
        );
        let symbols = vec!["B".to_string(), "X".to_string(), "A".to_string()];
        let results = e.decide_all(&symbols);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "B");
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert_eq!(results[2].1.as_ref().unwrap().symbol, "A");
    }

    #[test]
    fn features_expose_raw_inputs() {
        let e = engine(
            vec![row("A", "1,100", "5", "20", "3"), row("B", "100", "1", "1", "1")],
            1_000_000.0,
        );
        let f = e.features("A").unwrap();
        assert_eq!(f.ltp, 1100.0);
        assert_relative_eq!(f.volume_ratio, 1.5);
        assert_relative_eq!(f.momentum_score, 0.25);
        assert!(e.features("Z").is_err());
    }

    #[test]
    fn rejects_bad_capital() {
        let headers = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let ds = Arc::new(prepare(&RawTable::new(headers, vec![row("A", "1", "1", "1", "1")])).unwrap());
        assert!(DecisionEngine::new(ds.clone(), 0.0).is_err());
        assert!(DecisionEngine::new(ds.clone(), -5.0).is_err());
        assert!(DecisionEngine::new(ds.clone(), f64::NAN).is_err());
        assert!(DecisionEngine::new(ds, 1.0).is_ok());
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let e = engine(vec![row("A", "2,500", "10", "30", "5")], 1_000_000.0);
        let expected = e.decide("A").unwrap();
        let e = &e;
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(move || e.decide("A").unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}
