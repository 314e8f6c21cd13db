//! Configuration access port trait.

use crate::domain::error::SnaptraderError;
use crate::domain::prepare::parse_decimal;
use std::path::PathBuf;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Numeric value, `default` when the key is absent. A present value that
    /// does not parse is an error; thousands separators are accepted.
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, SnaptraderError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) => parse_decimal(&raw).ok_or_else(|| SnaptraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("{key} is not a number: {raw:?}"),
            }),
        }
    }

    /// Non-blank string value as a path.
    fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}
