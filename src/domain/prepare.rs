//! Data preparation: schema check, numeric cleaning and feature derivation.
//!
//! Preparation is all-or-nothing. Any missing column, unparsable number or
//! invalid symbol rejects the whole table and no partial [`Dataset`] exists.

use crate::domain::dataset::Dataset;
use crate::domain::error::SnaptraderError;
use crate::domain::stock::*;
use std::collections::HashSet;
use tracing::debug;

/// `|change_365d|` must exceed this for the momentum ratio to be taken.
pub const MOMENTUM_DENOMINATOR_FLOOR: f64 = 0.01;

const THOUSANDS_SEPARATOR: char = ',';

struct ColumnMap {
    symbol: usize,
    open: usize,
    high: usize,
    low: usize,
    ltp: usize,
    turnover: usize,
    week52_high: usize,
    week52_low: usize,
    change_30d: usize,
    change_365d: usize,
    volume_lacs: usize,
}

impl ColumnMap {
    fn resolve(table: &RawTable) -> Result<Self, SnaptraderError> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| table.column_index(c).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(SnaptraderError::malformed(format!(
                "missing required column(s): {}",
                missing
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let idx = |name: &str| table.column_index(name).unwrap_or_default();
        Ok(Self {
            symbol: idx(COL_SYMBOL),
            open: idx(COL_OPEN),
            high: idx(COL_HIGH),
            low: idx(COL_LOW),
            ltp: idx(COL_LTP),
            turnover: idx(COL_TURNOVER),
            week52_high: idx(COL_WEEK52_HIGH),
            week52_low: idx(COL_WEEK52_LOW),
            change_30d: idx(COL_CHANGE_30D),
            change_365d: idx(COL_CHANGE_365D),
            volume_lacs: idx(COL_VOLUME_LACS),
        })
    }
}

/// Parse a decimal that may carry thousands separators, e.g. `"1,23,456.70"`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|&c| c != THOUSANDS_SEPARATOR)
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `change_30d / change_365d`, or 0 when the yearly change is too close to zero.
pub fn momentum_score(change_30d: f64, change_365d: f64) -> f64 {
    if change_365d.abs() > MOMENTUM_DENOMINATOR_FLOOR {
        change_30d / change_365d
    } else {
        0.0
    }
}

/// Running mean; a run of identical values yields exactly that value.
fn running_mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut mean = None;
    for (i, v) in values.into_iter().enumerate() {
        mean = Some(match mean {
            None => v,
            Some(m) => m + (v - m) / (i + 1) as f64,
        });
    }
    mean
}

fn cell<'a>(row: &'a [String], col: usize) -> &'a str {
    row.get(col).map(String::as_str).unwrap_or("")
}

fn numeric(row: &[String], col: usize, name: &str, line: usize) -> Result<f64, SnaptraderError> {
    let raw = cell(row, col);
    parse_decimal(raw).ok_or_else(|| {
        SnaptraderError::malformed(format!(
            "row {line}: column '{name}' is not numeric: {raw:?}"
        ))
    })
}

/// Turn a raw snapshot table into a [`Dataset`].
pub fn prepare(table: &RawTable) -> Result<Dataset, SnaptraderError> {
    let cols = ColumnMap::resolve(table)?;

    if table.rows.is_empty() {
        return Err(SnaptraderError::EmptyDataset);
    }

    let mut seen = HashSet::with_capacity(table.rows.len());
    let mut records = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let line = i + 1;

        let symbol = cell(row, cols.symbol).trim().to_string();
        if symbol.is_empty() {
            return Err(SnaptraderError::malformed(format!(
                "row {line}: column '{COL_SYMBOL}' is empty"
            )));
        }
        if !seen.insert(symbol.clone()) {
            return Err(SnaptraderError::malformed(format!(
                "row {line}: duplicate symbol '{symbol}'"
            )));
        }

        let ltp = numeric(row, cols.ltp, COL_LTP, line)?;
        let change_30d = numeric(row, cols.change_30d, COL_CHANGE_30D, line)?;
        let change_365d = numeric(row, cols.change_365d, COL_CHANGE_365D, line)?;

        records.push(StockRecord {
            open: numeric(row, cols.open, COL_OPEN, line)?,
            high: numeric(row, cols.high, COL_HIGH, line)?,
            low: numeric(row, cols.low, COL_LOW, line)?,
            ltp,
            turnover: numeric(row, cols.turnover, COL_TURNOVER, line)?,
            week52_high: numeric(row, cols.week52_high, COL_WEEK52_HIGH, line)?,
            week52_low: numeric(row, cols.week52_low, COL_WEEK52_LOW, line)?,
            change_30d,
            change_365d,
            volume_lacs: numeric(row, cols.volume_lacs, COL_VOLUME_LACS, line)?,
            momentum_score: momentum_score(change_30d, change_365d),
            volume_ratio: 0.0,
            symbol,
        });
    }

    let mean_volume =
        running_mean(records.iter().map(|r| r.volume_lacs)).ok_or(SnaptraderError::EmptyDataset)?;
    if mean_volume == 0.0 {
        return Err(SnaptraderError::malformed(format!(
            "mean of '{COL_VOLUME_LACS}' is zero; volume ratio is undefined"
        )));
    }

    for record in &mut records {
        record.volume_ratio = record.volume_lacs / mean_volume;
    }

    debug!(rows = records.len(), mean_volume, "prepared snapshot dataset");
    Ok(Dataset::from_records(records, mean_volume))
}
