//! Decision export port trait.

use crate::domain::decision::DecisionResult;
use crate::domain::error::SnaptraderError;
use std::path::Path;

/// Port for exporting decision results.
pub trait ReportPort {
    /// One document holding every result, header first.
    fn render_all(&self, results: &[DecisionResult]) -> Result<Vec<u8>, SnaptraderError>;

    fn render(&self, result: &DecisionResult) -> Result<Vec<u8>, SnaptraderError> {
        self.render_all(std::slice::from_ref(result))
    }

    /// Default implementation: renders and writes the bytes to `output_path`.
    fn write(&self, result: &DecisionResult, output_path: &Path) -> Result<(), SnaptraderError> {
        let bytes = self.render(result)?;
        std::fs::write(output_path, bytes)?;
        Ok(())
    }
}
