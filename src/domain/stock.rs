//! Snapshot row representation.
//!
//! [`RawTable`] is the untyped table as it arrives from a data source;
//! [`StockRecord`] is one validated, typed row with its engineered features.

pub const COL_SYMBOL: &str = "Symbol";
pub const COL_OPEN: &str = "Open";
pub const COL_HIGH: &str = "High";
pub const COL_LOW: &str = "Low";
pub const COL_LTP: &str = "LTP";
pub const COL_TURNOVER: &str = "Turnover (crs.)";
pub const COL_WEEK52_HIGH: &str = "52w H";
pub const COL_WEEK52_LOW: &str = "52w L";
pub const COL_CHANGE_30D: &str = "30 d % chng";
pub const COL_CHANGE_365D: &str = "365 d % chng";
pub const COL_VOLUME_LACS: &str = "Volume (lacs)";

/// Every column a snapshot must carry, in the order they are validated.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    COL_SYMBOL,
    COL_OPEN,
    COL_HIGH,
    COL_LOW,
    COL_LTP,
    COL_TURNOVER,
    COL_WEEK52_HIGH,
    COL_WEEK52_LOW,
    COL_CHANGE_30D,
    COL_CHANGE_365D,
    COL_VOLUME_LACS,
];

/// Header names plus string cells, exactly as read from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord {
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub ltp: f64,
    pub turnover: f64,
    pub week52_high: f64,
    pub week52_low: f64,
    /// Percent, so 5.2 means 5.2%.
    pub change_30d: f64,
    pub change_365d: f64,
    pub volume_lacs: f64,
    pub momentum_score: f64,
    /// Relative to the mean volume of the dataset this record was prepared in.
    pub volume_ratio: f64,
}
