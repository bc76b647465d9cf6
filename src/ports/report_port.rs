//! Forecast output port trait.

use std::path::Path;

use crate::domain::error::SalecastError;
use crate::domain::forecast::ForecastRecord;

/// Port for persisting the forecast result set.
pub trait ReportPort {
    fn write(&self, records: &[ForecastRecord], output_path: &Path) -> Result<(), SalecastError>;
}
