//! Snapshot data access port trait.

use crate::domain::error::SnaptraderError;
use crate::domain::stock::RawTable;

/// Source of a raw market snapshot table.
pub trait DataPort {
    fn fetch_snapshot(&self) -> Result<RawTable, SnaptraderError>;
}
