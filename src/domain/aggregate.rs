//! Grouping raw sales rows into per-item yearly series.
//!
//! Rows are filtered to one currency, then summed into a single
//! observation per (item, year). The latest year is taken across the
//! whole filtered dataset, so every item is later extrapolated to the
//! same global next period.

use std::collections::BTreeMap;

use crate::domain::sales::{ItemSeries, Observation, SalesRow};

/// Filter to `currency`, sum duplicates per (item, year), and return the
/// series sorted by part number together with the latest year seen.
/// `None` means no row survived the filter.
pub fn build_series(rows: &[SalesRow], currency: &str) -> (Vec<ItemSeries>, Option<i32>) {
    let mut grouped: BTreeMap<&str, BTreeMap<i32, (f64, f64)>> = BTreeMap::new();
    let mut latest: Option<i32> = None;

    for row in rows {
        if row.currency != currency {
            continue;
        }
        latest = Some(latest.map_or(row.year, |y| y.max(row.year)));
        let totals = grouped
            .entry(row.part_no.as_str())
            .or_default()
            .entry(row.year)
            .or_insert((0.0, 0.0));
        totals.0 += row.quantity;
        totals.1 += row.total;
    }

    let series = grouped
        .into_iter()
        .map(|(part_no, years)| ItemSeries {
            part_no: part_no.to_string(),
            observations: years
                .into_iter()
                .map(|(year, (quantity, total))| Observation {
                    year,
                    quantity,
                    total,
                })
                .collect(),
        })
        .collect();

    (series, latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(part_no: &str, year: i32, quantity: f64, total: f64, currency: &str) -> SalesRow {
        SalesRow {
            part_no: part_no.into(),
            year,
            quantity,
            total,
            currency: currency.into(),
        }
    }

    #[test]
    fn duplicate_item_years_are_summed() {
        let rows = vec![
            row("P-1", 2020, 3.0, 300.0, "INR"),
            row("P-1", 2020, 2.0, 150.0, "INR"),
            row("P-1", 2019, 1.0, 90.0, "INR"),
        ];

        let (series, latest) = build_series(&rows, "INR");
        assert_eq!(latest, Some(2020));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].part_no, "P-1");
        assert_eq!(
            series[0].observations,
            vec![
                Observation {
                    year: 2019,
                    quantity: 1.0,
                    total: 90.0
                },
                Observation {
                    year: 2020,
                    quantity: 5.0,
                    total: 450.0
                },
            ]
        );
    }

    #[test]
    fn foreign_currency_rows_are_excluded_everywhere() {
        // The USD row has the latest year; it must not leak into the
        // series or the global latest-year computation.
        let rows = vec![
            row("P-1", 2019, 1.0, 100.0, "INR"),
            row("P-1", 2020, 2.0, 200.0, "INR"),
            row("P-2", 2025, 9.0, 900.0, "USD"),
        ];

        let (series, latest) = build_series(&rows, "INR");
        assert_eq!(latest, Some(2020));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].observations.len(), 2);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let (series, latest) = build_series(&[], "INR");
        assert!(series.is_empty());
        assert_eq!(latest, None);
    }

    #[test]
    fn series_are_sorted_by_part_number() {
        let rows = vec![
            row("ZZ-9", 2020, 1.0, 1.0, "INR"),
            row("AA-1", 2020, 1.0, 1.0, "INR"),
            row("MM-5", 2020, 1.0, 1.0, "INR"),
        ];

        let (series, _) = build_series(&rows, "INR");
        let parts: Vec<&str> = series.iter().map(|s| s.part_no.as_str()).collect();
        assert_eq!(parts, vec!["AA-1", "MM-5", "ZZ-9"]);
    }
}
