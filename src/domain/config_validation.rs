//! Configuration validation.
//!
//! Validates config fields before any data is loaded.

use crate::domain::error::SnaptraderError;
use crate::ports::config_port::ConfigPort;

pub const MIN_INITIAL_CAPITAL: f64 = 100_000.0;
pub const MAX_INITIAL_CAPITAL: f64 = 10_000_000.0;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 1_000_000.0;

/// Checks the file-level string values. Capital is checked once resolved,
/// see [`resolve_initial_capital`].
pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), SnaptraderError> {
    validate_default_symbol(config)?;
    validate_data_path(config)?;
    Ok(())
}

/// Command-line capital if given, else `[engine] initial_capital`, else the
/// default. Only the value actually used is bounds-checked.
pub fn resolve_initial_capital(
    config: &dyn ConfigPort,
    capital_override: Option<f64>,
) -> Result<f64, SnaptraderError> {
    let value = match capital_override {
        Some(v) => v,
        None => config.get_double("engine", "initial_capital", DEFAULT_INITIAL_CAPITAL)?,
    };
    validate_initial_capital(value)?;
    Ok(value)
}

/// Capital must lie within the application bounds, inclusive.
pub fn validate_initial_capital(value: f64) -> Result<(), SnaptraderError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SnaptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    if !(MIN_INITIAL_CAPITAL..=MAX_INITIAL_CAPITAL).contains(&value) {
        return Err(SnaptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "initial_capital".to_string(),
            reason: format!(
                "initial_capital must be between {} and {}",
                MIN_INITIAL_CAPITAL, MAX_INITIAL_CAPITAL
            ),
        });
    }
    Ok(())
}

fn validate_default_symbol(config: &dyn ConfigPort) -> Result<(), SnaptraderError> {
    match config.get_string("engine", "default_symbol") {
        Some(s) if s.trim().is_empty() => Err(SnaptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "default_symbol".to_string(),
            reason: "default_symbol must not be blank".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), SnaptraderError> {
    match config.get_string("data", "path") {
        Some(s) if s.trim().is_empty() => Err(SnaptraderError::ConfigInvalid {
            section: "data".to_string(),
            key: "path".to_string(),
            reason: "path must not be blank".to_string(),
        }),
        _ => Ok(()),
    }
}
