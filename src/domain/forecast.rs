//! Per-item forecasting and batch orchestration.
//!
//! Each item is a pure function of its own series and the global
//! forecast year, so the batch fans items out in parallel and collects
//! results; nothing is shared between items.

use rayon::iter::Either;
use rayon::prelude::*;

use crate::domain::error::{ItemError, SeriesKind};
use crate::domain::sales::ItemSeries;
use crate::domain::selection;

/// One forecast per item, the unit the writer persists. A `None`
/// prediction marks a series whose solve failed; the other series of the
/// same item is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    pub part_no: String,
    pub year: i32,
    pub quantity: Option<f64>,
    pub total: Option<f64>,
    pub currency: String,
}

/// How an item's record was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastPath {
    /// Chosen polynomial degree per series, `None` where the solve
    /// failed. The two series select independently and may differ.
    Fitted {
        quantity_degree: Option<usize>,
        total_degree: Option<usize>,
    },
    /// A single year of history: predictions copy that year's values.
    SingleYear,
}

/// Record plus diagnostics for one successfully processed item.
#[derive(Debug, Clone)]
pub struct ItemForecast {
    pub record: ForecastRecord,
    pub path: ForecastPath,
    /// Per-series solve failures; the matching prediction is `None`.
    pub series_errors: Vec<ItemError>,
}

impl ItemForecast {
    pub fn used_fallback(&self) -> bool {
        self.path == ForecastPath::SingleYear
    }
}

/// Outcome of forecasting a whole batch of items.
#[derive(Debug)]
pub struct BatchResult {
    pub forecasts: Vec<ItemForecast>,
    /// Items rejected outright (empty or non-finite series).
    pub failures: Vec<ItemError>,
}

impl BatchResult {
    pub fn records(&self) -> Vec<ForecastRecord> {
        self.forecasts.iter().map(|f| f.record.clone()).collect()
    }

    pub fn fallback_count(&self) -> usize {
        self.forecasts.iter().filter(|f| f.used_fallback()).count()
    }

    pub fn fit_failure_count(&self) -> usize {
        self.forecasts.iter().map(|f| f.series_errors.len()).sum()
    }
}

fn fit_series(
    part_no: &str,
    kind: SeriesKind,
    xs: &[f64],
    ys: &[f64],
    forecast_year: i32,
) -> Result<(f64, usize), ItemError> {
    let result = selection::select_best(xs, ys).map_err(|reason| ItemError::FitFailure {
        part_no: part_no.to_string(),
        series: kind,
        reason: reason.to_string(),
    })?;
    Ok((result.model.predict(forecast_year as f64), result.degree()))
}

/// Forecast one item for the global forecast year. Validation failures
/// reject the item; per-series solve failures only blank that series.
pub fn forecast_item(
    series: &ItemSeries,
    forecast_year: i32,
    currency: &str,
) -> Result<ItemForecast, ItemError> {
    series.validate()?;

    if series.observations.len() == 1 {
        let only = &series.observations[0];
        return Ok(ItemForecast {
            record: ForecastRecord {
                part_no: series.part_no.clone(),
                year: forecast_year,
                quantity: Some(only.quantity),
                total: Some(only.total),
                currency: currency.to_string(),
            },
            path: ForecastPath::SingleYear,
            series_errors: Vec::new(),
        });
    }

    let xs: Vec<f64> = series.observations.iter().map(|o| o.year as f64).collect();
    let quantities: Vec<f64> = series.observations.iter().map(|o| o.quantity).collect();
    let totals: Vec<f64> = series.observations.iter().map(|o| o.total).collect();

    let mut series_errors = Vec::new();

    let (quantity, quantity_degree) = match fit_series(
        &series.part_no,
        SeriesKind::Quantity,
        &xs,
        &quantities,
        forecast_year,
    ) {
        Ok((prediction, degree)) => (Some(prediction), Some(degree)),
        Err(e) => {
            series_errors.push(e);
            (None, None)
        }
    };

    let (total, total_degree) = match fit_series(
        &series.part_no,
        SeriesKind::Total,
        &xs,
        &totals,
        forecast_year,
    ) {
        Ok((prediction, degree)) => (Some(prediction), Some(degree)),
        Err(e) => {
            series_errors.push(e);
            (None, None)
        }
    };

    Ok(ItemForecast {
        record: ForecastRecord {
            part_no: series.part_no.clone(),
            year: forecast_year,
            quantity,
            total,
            currency: currency.to_string(),
        },
        path: ForecastPath::Fitted {
            quantity_degree,
            total_degree,
        },
        series_errors,
    })
}

/// Forecast every item for the same global year. Items are independent,
/// so this is a parallel map; per-item errors are collected, never
/// propagated.
pub fn run_batch(items: &[ItemSeries], forecast_year: i32, currency: &str) -> BatchResult {
    let (forecasts, failures): (Vec<_>, Vec<_>) = items
        .par_iter()
        .map(|series| forecast_item(series, forecast_year, currency))
        .partition_map(|outcome| match outcome {
            Ok(forecast) => Either::Left(forecast),
            Err(e) => Either::Right(e),
        });

    BatchResult {
        forecasts,
        failures,
    }
}
