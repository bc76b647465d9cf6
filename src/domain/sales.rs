//! Sales rows and per-item yearly series.

use crate::domain::error::{ItemError, SeriesKind};

/// One input transaction, reduced to the columns the forecaster uses.
/// The period column has already been collapsed to a calendar year.
#[derive(Debug, Clone)]
pub struct SalesRow {
    pub part_no: String,
    pub year: i32,
    pub quantity: f64,
    pub total: f64,
    pub currency: String,
}

/// Yearly totals for one item: unit quantity and monetary total summed
/// across every transaction in that year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub quantity: f64,
    pub total: f64,
}

/// An item and its observations, one per year the item appeared.
/// The aggregator guarantees years are unique within a series.
#[derive(Debug, Clone)]
pub struct ItemSeries {
    pub part_no: String,
    pub observations: Vec<Observation>,
}

impl ItemSeries {
    /// Boundary validation before any fitting: a series must have at
    /// least one observation and only finite values.
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.observations.is_empty() {
            return Err(ItemError::InsufficientData {
                part_no: self.part_no.clone(),
            });
        }
        for obs in &self.observations {
            if !obs.quantity.is_finite() {
                return Err(ItemError::DegenerateInput {
                    part_no: self.part_no.clone(),
                    year: obs.year,
                    series: SeriesKind::Quantity,
                });
            }
            if !obs.total.is_finite() {
                return Err(ItemError::DegenerateInput {
                    part_no: self.part_no.clone(),
                    year: obs.year,
                    series: SeriesKind::Total,
                });
            }
        }
        Ok(())
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.observations.iter().map(|o| o.year).max()
    }
}
