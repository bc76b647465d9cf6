//! Domain error types.

use std::process::ExitCode;

/// Which of the two measured series a value or fit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Quantity,
    Total,
}

impl SeriesKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SeriesKind::Quantity => "quantity",
            SeriesKind::Total => "total",
        }
    }
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-item forecasting error. One bad item never aborts the batch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ItemError {
    #[error("no observations for {part_no}")]
    InsufficientData { part_no: String },

    #[error("non-finite {series} for {part_no} in year {year}")]
    DegenerateInput {
        part_no: String,
        year: i32,
        series: SeriesKind,
    },

    #[error("least-squares solve failed for {part_no} ({series}): {reason}")]
    FitFailure {
        part_no: String,
        series: SeriesKind,
        reason: String,
    },
}

/// Top-level error type for salecast.
#[derive(Debug, thiserror::Error)]
pub enum SalecastError {
    #[error("data error in {file}: {reason}")]
    Data { file: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no {currency} rows in input after filtering")]
    NoData { currency: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SalecastError> for ExitCode {
    fn from(err: &SalecastError) -> Self {
        let code: u8 = match err {
            SalecastError::Io(_) => 1,
            SalecastError::ConfigParse { .. }
            | SalecastError::ConfigMissing { .. }
            | SalecastError::ConfigInvalid { .. } => 2,
            SalecastError::Data { .. } => 3,
            SalecastError::NoData { .. } => 5,
        };
        ExitCode::from(code)
    }
}
