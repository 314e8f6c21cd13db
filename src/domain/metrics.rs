//! Single-period performance metrics.

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const ANNUAL_RISK_FREE_RATE: f64 = 0.05;
/// Fixed stand-in for return volatility; nothing is estimated.
pub const MOCK_VOLATILITY: f64 = 0.1;

pub fn daily_risk_free_rate() -> f64 {
    ANNUAL_RISK_FREE_RATE / TRADING_DAYS_PER_YEAR
}

/// `(cumulative_return - daily_rf) / MOCK_VOLATILITY`, before any clamping.
pub fn raw_sharpe(cumulative_return: f64) -> f64 {
    (cumulative_return - daily_risk_free_rate()) / MOCK_VOLATILITY
}

/// Sharpe ratio as reported: 0.0 unless the cumulative return is positive.
pub fn reported_sharpe(cumulative_return: f64) -> f64 {
    if cumulative_return > 0.0 {
        raw_sharpe(cumulative_return)
    } else {
        0.0
    }
}
