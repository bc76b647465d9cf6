//! Tab-separated forecast output adapter.
//!
//! Non-numeric fields are quoted and numeric predictions are written
//! bare, so spreadsheet imports keep part numbers as text. A series
//! whose solve failed is written as an empty field.

use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use std::path::Path;

use crate::domain::error::SalecastError;
use crate::domain::forecast::ForecastRecord;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct OutputRow<'a> {
    #[serde(rename = "PART NO")]
    part_no: &'a str,
    #[serde(rename = "year")]
    year: i32,
    #[serde(rename = "Predicted Quantity")]
    quantity: Option<f64>,
    #[serde(rename = "Predicted Item Total")]
    total: Option<f64>,
    #[serde(rename = "Currency")]
    currency: &'a str,
}

pub struct TsvReportAdapter;

impl ReportPort for TsvReportAdapter {
    fn write(&self, records: &[ForecastRecord], output_path: &Path) -> Result<(), SalecastError> {
        let data_error = |reason: String| SalecastError::Data {
            file: output_path.display().to_string(),
            reason,
        };

        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::NonNumeric)
            .from_path(output_path)
            .map_err(|e| data_error(format!("failed to open for writing: {}", e)))?;

        for record in records {
            writer
                .serialize(OutputRow {
                    part_no: &record.part_no,
                    year: record.year,
                    quantity: record.quantity,
                    total: record.total,
                    currency: &record.currency,
                })
                .map_err(|e| data_error(format!("failed to write record: {}", e)))?;
        }

        writer
            .flush()
            .map_err(|e| data_error(format!("failed to flush: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(part_no: &str, quantity: Option<f64>, total: Option<f64>) -> ForecastRecord {
        ForecastRecord {
            part_no: part_no.into(),
            year: 2021,
            quantity,
            total,
            currency: "INR".into(),
        }
    }

    #[test]
    fn writes_header_and_quotes_non_numeric_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.tsv");

        TsvReportAdapter
            .write(&[record("P-100", Some(110.0), Some(5250.5))], &path)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"PART NO\"\t\"year\"\t\"Predicted Quantity\"\t\"Predicted Item Total\"\t\"Currency\""
        );
        assert_eq!(lines.next().unwrap(), "\"P-100\"\t2021\t110.0\t5250.5\t\"INR\"");
    }

    #[test]
    fn failed_series_become_empty_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.tsv");

        TsvReportAdapter
            .write(&[record("P-7", None, Some(42.0))], &path)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let data_line = content.lines().nth(1).unwrap();
        let fields: Vec<&str> = data_line.split('\t').collect();
        assert_eq!(fields[2], "\"\"");
        assert_eq!(fields[3], "42.0");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("predictions.tsv");
        let err = TsvReportAdapter.write(&[], &path).unwrap_err();
        assert!(matches!(err, SalecastError::Data { .. }));
    }
}
