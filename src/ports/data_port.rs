//! Sales data access port trait.

use crate::domain::error::SalecastError;
use crate::domain::sales::SalesRow;

/// Rows read from the source, plus how many input lines were dropped
/// because their period column would not parse.
#[derive(Debug)]
pub struct FetchResult {
    pub rows: Vec<SalesRow>,
    pub skipped_dates: usize,
}

pub trait SalesDataPort {
    fn fetch_rows(&self) -> Result<FetchResult, SalecastError>;
}
