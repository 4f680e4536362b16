//! Comparison assembly: date-joined views across selected series.
//!
//! `assemble` performs an outer join on date across every selected
//! (country, indicator) pair. The selection is sorted and de-duplicated
//! internally so table content depends only on set membership, never on
//! insertion order. Missing combinations stay missing; nothing is zeroed
//! or interpolated.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::data::ProviderAdapter;
use crate::error::AppError;

/// One joined column: a series aligned to the table's date spine.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesColumn {
    pub country_key: String,
    pub indicator_key: String,
    /// Display label, e.g. "United States — Inflation (CPI, % YoY)".
    pub label: String,
    pub unit: &'static str,
    pub is_synthetic: bool,
    pub fallback_reason: Option<String>,
    /// One cell per table date; `None` where this series has no value.
    pub values: Vec<Option<f64>>,
}

/// Read-only, date-joined view across the selected series. Recomputed from
/// scratch on every interaction; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    /// Ascending spine: every date present in any joined series.
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<SeriesColumn>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column_index(&self, country_key: &str, indicator_key: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.country_key == country_key && c.indicator_key == indicator_key)
    }

    /// The most recent non-missing cell of a column.
    pub fn latest(&self, col: usize) -> Option<(NaiveDate, f64)> {
        let column = self.columns.get(col)?;
        self.dates
            .iter()
            .zip(&column.values)
            .rev()
            .find_map(|(d, v)| v.map(|v| (*d, v)))
    }

    /// Percent change between the table's boundary rows.
    ///
    /// A missing boundary cell makes the statistic undefined (`None`);
    /// it is never silently substituted with zero or a nearby value.
    pub fn pct_change_over_range(&self, col: usize) -> Option<f64> {
        let column = self.columns.get(col)?;
        let first = column.values.first().copied().flatten()?;
        let last = column.values.last().copied().flatten()?;
        if first == 0.0 {
            return None;
        }
        Some((last / first - 1.0) * 100.0)
    }

    /// Difference between the last row and the row twelve back (the KPI
    /// panel's "12-period Δ"). Undefined when either cell is missing or
    /// the table is too short.
    pub fn trailing_delta(&self, col: usize) -> Option<f64> {
        let column = self.columns.get(col)?;
        let n = column.values.len();
        if n < 13 {
            return None;
        }
        let last = column.values[n - 1]?;
        let base = column.values[n - 13]?;
        Some(last - base)
    }

    /// Pearson correlation between two columns over rows where both are
    /// present. `None` with fewer than two complete pairs or a degenerate
    /// (constant) column.
    pub fn correlation(&self, a: usize, b: usize) -> Option<f64> {
        let ca = self.columns.get(a)?;
        let cb = self.columns.get(b)?;
        let pairs: Vec<(f64, f64)> = ca
            .values
            .iter()
            .zip(&cb.values)
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect();
        if pairs.len() < 2 {
            return None;
        }
        let n = pairs.len() as f64;
        let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        if var_x <= 0.0 || var_y <= 0.0 {
            return None;
        }
        Some(cov / (var_x * var_y).sqrt())
    }
}

/// Fetch every selected pair and outer-join the results on date.
pub fn assemble(
    adapter: &ProviderAdapter<'_>,
    selected: &[(String, String)],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ComparisonTable, AppError> {
    // Canonical selection order: output depends only on set membership.
    let mut selection: Vec<(String, String)> = selected.to_vec();
    selection.sort();
    selection.dedup();

    let mut fetched = Vec::with_capacity(selection.len());
    for (country_key, indicator_key) in &selection {
        fetched.push(adapter.fetch(country_key, indicator_key, start, end)?);
    }

    let mut spine: BTreeSet<NaiveDate> = BTreeSet::new();
    for series in &fetched {
        spine.extend(series.points.iter().map(|p| p.date));
    }
    let dates: Vec<NaiveDate> = spine.into_iter().collect();

    let registries = adapter.registries();
    let mut columns = Vec::with_capacity(fetched.len());
    for series in fetched {
        let country = registries.countries.lookup(&series.country_key)?;
        let indicator = registries.indicators.lookup(&series.indicator_key)?;

        let by_date: BTreeMap<NaiveDate, f64> = series
            .points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date, v)))
            .collect();
        let values = dates.iter().map(|d| by_date.get(d).copied()).collect();

        columns.push(SeriesColumn {
            label: format!("{} — {}", country.display_name, indicator.label),
            unit: indicator.unit,
            country_key: series.country_key,
            indicator_key: series.indicator_key,
            is_synthetic: series.is_synthetic,
            fallback_reason: series.fallback_reason,
            values,
        });
    }

    Ok(ComparisonTable { dates, columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FredClient, WbClient};
    use crate::registry::{CountrySpec, Registries};

    /// Two provider-less countries so every fetch stays offline and
    /// deterministic (synthetic fallback).
    fn offline_registries() -> Registries {
        let base = Registries::new();
        let indicators = base
            .indicators
            .keys()
            .iter()
            .map(|k| base.indicators.lookup(k).unwrap().clone())
            .collect();
        let countries = vec![
            CountrySpec {
                key: "TL".to_string(),
                display_name: "Testland".to_string(),
                wb_code: None,
            },
            CountrySpec {
                key: "ZZ".to_string(),
                display_name: "Zedland".to_string(),
                wb_code: None,
            },
        ];
        Registries::from_parts(indicators, countries)
    }

    fn adapter(regs: &Registries) -> ProviderAdapter<'_> {
        ProviderAdapter::with_clients(regs, FredClient::with_key(None), WbClient::new())
    }

    fn pair(c: &str, i: &str) -> (String, String) {
        (c.to_string(), i.to_string())
    }

    fn jan(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
    }

    #[test]
    fn join_is_order_insensitive() {
        let regs = offline_registries();
        let adapter = adapter(&regs);
        let ab = assemble(
            &adapter,
            &[pair("TL", "CPI"), pair("ZZ", "CPI")],
            jan(2020),
            jan(2022),
        )
        .unwrap();
        let ba = assemble(
            &adapter,
            &[pair("ZZ", "CPI"), pair("TL", "CPI")],
            jan(2020),
            jan(2022),
        )
        .unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn repeated_assembly_is_idempotent() {
        let regs = offline_registries();
        let adapter = adapter(&regs);
        let selection = [pair("TL", "CPI"), pair("TL", "UNEMP"), pair("ZZ", "POLICY")];
        let a = assemble(&adapter, &selection, jan(2019), jan(2023)).unwrap();
        let b = assemble(&adapter, &selection, jan(2019), jan(2023)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_selections_collapse() {
        let regs = offline_registries();
        let adapter = adapter(&regs);
        let table = assemble(
            &adapter,
            &[pair("TL", "CPI"), pair("TL", "CPI")],
            jan(2020),
            jan(2021),
        )
        .unwrap();
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn missing_cells_stay_missing_in_outer_join() {
        // Hand-build a table whose columns have disjoint dates: the join
        // logic is exercised through assemble above; here we pin the
        // missing-cell contract on the derived statistics.
        let dates = vec![jan(2020), jan(2021), jan(2022)];
        let col = |values: Vec<Option<f64>>| SeriesColumn {
            country_key: "TL".to_string(),
            indicator_key: "CPI".to_string(),
            label: "Testland — CPI".to_string(),
            unit: "%",
            is_synthetic: true,
            fallback_reason: None,
            values,
        };
        let table = ComparisonTable {
            dates,
            columns: vec![
                col(vec![Some(1.0), None, Some(3.0)]),
                col(vec![None, Some(2.0), Some(4.0)]),
            ],
        };

        assert_eq!(table.columns[0].values[1], None);
        // Boundary missing: pct change undefined for column 1.
        assert_eq!(table.pct_change_over_range(1), None);
        assert!((table.pct_change_over_range(0).unwrap() - 200.0).abs() < 1e-9);
        assert_eq!(table.latest(0), Some((jan(2022), 3.0)));
    }

    #[test]
    fn assembled_spine_covers_both_series() {
        let regs = offline_registries();
        let adapter = adapter(&regs);
        // Different ranges produce different date spines per column.
        let long = assemble(&adapter, &[pair("TL", "CPI")], jan(2020), jan(2022)).unwrap();
        assert_eq!(long.dates.len(), 25);
        assert_eq!(long.columns[0].values.len(), long.dates.len());
        assert!(long.columns[0].values.iter().all(|v| v.is_some()));
    }

    #[test]
    fn correlation_requires_complete_pairs() {
        let dates = vec![jan(2020), jan(2021), jan(2022), jan(2023)];
        let col = |values: Vec<Option<f64>>| SeriesColumn {
            country_key: "TL".to_string(),
            indicator_key: "CPI".to_string(),
            label: String::new(),
            unit: "%",
            is_synthetic: true,
            fallback_reason: None,
            values,
        };
        let table = ComparisonTable {
            dates,
            columns: vec![
                col(vec![Some(1.0), Some(2.0), Some(3.0), None]),
                col(vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0)]),
                col(vec![Some(5.0), None, None, None]),
            ],
        };
        // Perfectly linear over the three complete pairs.
        let r = table.correlation(0, 1).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        // Only one complete pair with column 2.
        assert_eq!(table.correlation(0, 2), None);
    }

    #[test]
    fn trailing_delta_needs_thirteen_rows() {
        let dates: Vec<NaiveDate> = (0..14)
            .map(|m| {
                jan(2020)
                    .checked_add_months(chrono::Months::new(m))
                    .unwrap()
            })
            .collect();
        let values: Vec<Option<f64>> = (0..14).map(|i| Some(i as f64)).collect();
        let table = ComparisonTable {
            dates,
            columns: vec![SeriesColumn {
                country_key: "TL".to_string(),
                indicator_key: "UNEMP".to_string(),
                label: String::new(),
                unit: "%",
                is_synthetic: true,
                fallback_reason: None,
                values,
            }],
        };
        assert_eq!(table.trailing_delta(0), Some(12.0));
    }
}
