//! CSV snapshot data adapter.

use crate::domain::error::SnaptraderError;
use crate::domain::stock::RawTable;
use crate::ports::data_port::DataPort;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// Read a header row plus records. Headers are kept verbatim; field values
/// are trimmed. Rows may be ragged; the preparer reports short rows.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable, SnaptraderError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| SnaptraderError::malformed(format!("CSV header error: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record =
            result.map_err(|e| SnaptraderError::malformed(format!("CSV parse error: {e}")))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

impl DataPort for CsvAdapter {
    fn fetch_snapshot(&self) -> Result<RawTable, SnaptraderError> {
        let content = fs::read(&self.path).map_err(|e| {
            SnaptraderError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", self.path.display(), e),
            ))
        })?;
        read_table(content.as_slice())
    }
}
