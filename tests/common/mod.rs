#![allow(dead_code)]

use snaptrader::adapters::csv_adapter::read_table;
use snaptrader::domain::decision::DecisionResult;
use snaptrader::domain::engine::EngineConfig;
use snaptrader::domain::error::SnaptraderError;
use snaptrader::domain::stock::RawTable;
use snaptrader::ports::data_port::DataPort;
use snaptrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "Symbol,Open,High,Low,LTP,Turnover (crs.),52w H,52w L,30 d % chng,365 d % chng,Volume (lacs)";

/// Equal volumes, so every volume ratio is exactly 1.
///
/// RELIANCE scores 0.18 (BUY), TCS -0.23 (SELL, falling month),
/// INFY 0.031 (HOLD), HDFCBANK -0.214 (SELL, rising month).
pub const SNAPSHOT_CSV: &str = "Symbol,Open,High,Low,LTP,Turnover (crs.),52w H,52w L,30 d % chng,365 d % chng,Volume (lacs)
RELIANCE,\"2,480.00\",\"2,520.00\",\"2,470.00\",\"2,500.00\",\"2,512.34\",\"2,856.15\",\"2,180.00\",10,30,10
TCS,\"3,450.00\",\"3,470.00\",\"3,400.00\",\"3,420.50\",\"1,120.80\",\"4,043.00\",\"3,056.05\",-10,-40,10
INFY,\"1,490.00\",\"1,510.00\",\"1,480.00\",\"1,500.00\",830.15,\"1,953.90\",\"1,311.30\",2,5,10
HDFCBANK,\"1,640.00\",\"1,660.00\",\"1,630.00\",\"1,650.25\",\"1,402.00\",\"1,725.00\",\"1,271.75\",12,-50,10
";

pub fn snapshot_table() -> RawTable {
    read_table(SNAPSHOT_CSV.as_bytes()).unwrap()
}

pub fn write_snapshot(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("snapshot.csv");
    std::fs::write(&path, content).unwrap();
    path
}

pub struct MockDataPort {
    pub table: Option<RawTable>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(table: RawTable) -> Self {
        Self {
            table: Some(table),
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            table: None,
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_snapshot(&self) -> Result<RawTable, SnaptraderError> {
        if let Some(reason) = &self.error {
            return Err(SnaptraderError::Io(std::io::Error::other(reason.clone())));
        }
        Ok(self.table.clone().unwrap_or_default())
    }
}

/// Report port that records what it was asked to render instead of writing.
#[derive(Default)]
pub struct RecordingReportPort {
    pub rendered: RefCell<Vec<String>>,
    pub written: RefCell<Vec<PathBuf>>,
    pub documents: RefCell<usize>,
}

impl ReportPort for RecordingReportPort {
    fn render_all(&self, results: &[DecisionResult]) -> Result<Vec<u8>, SnaptraderError> {
        *self.documents.borrow_mut() += 1;
        let mut out = String::new();
        for result in results {
            self.rendered.borrow_mut().push(result.symbol.clone());
            out.push_str(&format!("{},{}\n", result.symbol, result.signal));
        }
        Ok(out.into_bytes())
    }

    fn write(&self, result: &DecisionResult, output_path: &Path) -> Result<(), SnaptraderError> {
        self.render(result)?;
        self.written.borrow_mut().push(output_path.to_path_buf());
        Ok(())
    }
}

pub fn engine_config(initial_capital: f64, output_dir: &Path) -> EngineConfig {
    EngineConfig {
        initial_capital,
        default_symbol: None,
        data_path: None,
        output_dir: output_dir.to_path_buf(),
    }
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn is_success(code: std::process::ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", std::process::ExitCode::SUCCESS)
}

pub fn exit_code_is(code: std::process::ExitCode, expected: u8) -> bool {
    format!("{code:?}") == format!("{:?}", std::process::ExitCode::from(expected))
}
