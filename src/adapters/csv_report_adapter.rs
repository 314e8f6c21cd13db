//! CSV export of decision results, one row per symbol under a single header.

use crate::domain::decision::DecisionResult;
use crate::domain::error::SnaptraderError;
use crate::domain::signal::Signal;
use crate::ports::report_port::ReportPort;
use serde::Serialize;

/// Export column names, in order.
pub const EXPORT_HEADER: [&str; 11] = [
    "Symbol",
    "LTP",
    "30d % Chng",
    "365d % Chng",
    "DRL_Score",
    "Final_Signal",
    "Initial_Capital",
    "Final_Capital",
    "Cumulative_Return",
    "Sharpe_Ratio",
    "Simulated_Profit",
];

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Symbol")]
    symbol: &'a str,
    #[serde(rename = "LTP")]
    ltp: f64,
    #[serde(rename = "30d % Chng")]
    change_30d: f64,
    #[serde(rename = "365d % Chng")]
    change_365d: f64,
    #[serde(rename = "DRL_Score")]
    score: f64,
    #[serde(rename = "Final_Signal")]
    signal: Signal,
    #[serde(rename = "Initial_Capital")]
    initial_capital: f64,
    #[serde(rename = "Final_Capital")]
    final_capital: f64,
    #[serde(rename = "Cumulative_Return")]
    cumulative_return: f64,
    #[serde(rename = "Sharpe_Ratio")]
    sharpe_ratio: f64,
    #[serde(rename = "Simulated_Profit")]
    simulated_profit: f64,
}

impl<'a> From<&'a DecisionResult> for ExportRow<'a> {
    fn from(r: &'a DecisionResult) -> Self {
        Self {
            symbol: &r.symbol,
            ltp: r.ltp,
            change_30d: r.change_30d,
            change_365d: r.change_365d,
            score: r.score,
            signal: r.signal,
            initial_capital: r.initial_capital,
            final_capital: r.final_capital,
            cumulative_return: r.cumulative_return,
            sharpe_ratio: r.sharpe_ratio,
            simulated_profit: r.simulated_profit,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// `decision_<SYMBOL>.csv`, with path separators in the symbol replaced.
    pub fn file_name(symbol: &str) -> String {
        let safe: String = symbol
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        format!("decision_{safe}.csv")
    }
}

impl ReportPort for CsvReportAdapter {
    fn render_all(&self, results: &[DecisionResult]) -> Result<Vec<u8>, SnaptraderError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for result in results {
            wtr.serialize(ExportRow::from(result))
                .map_err(|e| SnaptraderError::Io(std::io::Error::other(e)))?;
        }
        wtr.into_inner()
            .map_err(|e| SnaptraderError::Io(std::io::Error::other(e.to_string())))
    }
}
