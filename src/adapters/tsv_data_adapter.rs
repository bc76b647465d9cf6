//! Tab-separated sales file adapter.
//!
//! Headers are trimmed before matching, currency labels are trimmed and
//! uppercased, and the period column accepts day-first dates or a bare
//! year. Rows whose period fails to parse are dropped and counted;
//! malformed numeric fields fail the read with the record position.

use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;

use crate::domain::error::SalecastError;
use crate::domain::sales::SalesRow;
use crate::ports::data_port::{FetchResult, SalesDataPort};

const DATE_FORMATS: [&str; 4] = ["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d", "%d.%m.%Y"];

/// Source column names, as they appear in the file header (after
/// trimming). Defaults match the export this pipeline was built around.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub part: String,
    pub period: String,
    pub quantity: String,
    pub total: String,
    pub currency: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            part: "PART NO".to_string(),
            period: "PERIOD".to_string(),
            quantity: "QTY".to_string(),
            total: "TOTAL PRICE (INR)".to_string(),
            currency: "CURRENCY".to_string(),
        }
    }
}

pub struct TsvDataAdapter {
    path: PathBuf,
    columns: ColumnMap,
}

impl TsvDataAdapter {
    pub fn new(path: PathBuf, columns: ColumnMap) -> Self {
        Self { path, columns }
    }

    fn data_error(&self, reason: String) -> SalecastError {
        SalecastError::Data {
            file: self.path.display().to_string(),
            reason,
        }
    }

    /// Extract the calendar year from a period field. Day-first date
    /// formats are tried before falling back to a bare 4-digit year.
    fn parse_period(raw: &str) -> Option<i32> {
        let raw = raw.trim();
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                return Some(date.year());
            }
        }
        raw.parse::<i32>().ok().filter(|y| (1000..=9999).contains(y))
    }

    fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
        headers.iter().position(|h| h.trim() == name)
    }
}

impl SalesDataPort for TsvDataAdapter {
    fn fetch_rows(&self) -> Result<FetchResult, SalecastError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(&self.path)
            .map_err(|e| self.data_error(format!("failed to open: {}", e)))?;

        let headers = reader
            .headers()
            .map_err(|e| self.data_error(format!("failed to read header: {}", e)))?
            .clone();

        let lookup = |name: &str| {
            Self::column_index(&headers, name)
                .ok_or_else(|| self.data_error(format!("missing column '{}'", name)))
        };
        let part_idx = lookup(&self.columns.part)?;
        let period_idx = lookup(&self.columns.period)?;
        let quantity_idx = lookup(&self.columns.quantity)?;
        let total_idx = lookup(&self.columns.total)?;
        let currency_idx = lookup(&self.columns.currency)?;

        let mut rows = Vec::new();
        let mut skipped_dates = 0usize;

        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| self.data_error(format!("parse error: {}", e)))?;
            let field = |idx: usize, name: &str| {
                record.get(idx).ok_or_else(|| {
                    self.data_error(format!("record {}: missing {} field", line + 2, name))
                })
            };

            let year = match Self::parse_period(field(period_idx, "period")?) {
                Some(year) => year,
                None => {
                    skipped_dates += 1;
                    continue;
                }
            };

            let quantity: f64 = field(quantity_idx, "quantity")?.trim().parse().map_err(|e| {
                self.data_error(format!("record {}: invalid quantity: {}", line + 2, e))
            })?;
            let total: f64 = field(total_idx, "total")?.trim().parse().map_err(|e| {
                self.data_error(format!("record {}: invalid total: {}", line + 2, e))
            })?;

            rows.push(SalesRow {
                part_no: field(part_idx, "part")?.trim().to_string(),
                year,
                quantity,
                total,
                currency: field(currency_idx, "currency")?.trim().to_uppercase(),
            });
        }

        Ok(FetchResult {
            rows,
            skipped_dates,
        })
    }
}
