//! Prepared, read-only collection of stock records indexed by symbol.

use crate::domain::error::SnaptraderError;
use crate::domain::stock::StockRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<StockRecord>,
    index: HashMap<String, usize>,
    mean_volume: f64,
}

impl Dataset {
    /// Callers must have rejected empty input and duplicate symbols already;
    /// see [`crate::domain::prepare::prepare`].
    pub(crate) fn from_records(records: Vec<StockRecord>, mean_volume: f64) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.symbol.clone(), i))
            .collect();
        Self {
            records,
            index,
            mean_volume,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn mean_volume(&self) -> f64 {
        self.mean_volume
    }

    pub fn get(&self, symbol: &str) -> Option<&StockRecord> {
        self.index.get(symbol).map(|&i| &self.records[i])
    }

    pub fn lookup(&self, symbol: &str) -> Result<&StockRecord, SnaptraderError> {
        self.get(symbol)
            .ok_or_else(|| SnaptraderError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Sorted symbols.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.records.iter().map(|r| r.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }

    /// `preferred` when present, otherwise the first symbol in sorted order.
    pub fn default_symbol(&self, preferred: Option<&str>) -> Option<&str> {
        match preferred {
            Some(p) if self.contains(p) => self.get(p).map(|r| r.symbol.as_str()),
            _ => self.symbols().into_iter().next(),
        }
    }
}
