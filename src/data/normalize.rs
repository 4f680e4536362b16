//! Series normalization: one canonical shape out of heterogeneous payloads.
//!
//! Responsibilities:
//! - parse provider date strings into `NaiveDate`
//! - coerce values, keeping missing entries as explicit `None` rows
//!   (dropping them would misalign downstream joins)
//! - collapse duplicate dates deterministically (last provider row wins)
//! - sort ascending and clip to the requested range
//!
//! Rows with unparseable dates are skipped; a malformed date carries no
//! join key, so there is nothing to keep aligned.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};

use crate::data::RawSeries;
use crate::domain::{ObservationPoint, SeriesResult};
use crate::registry::{CountrySpec, IndicatorSpec};

pub fn normalize(
    raw: RawSeries,
    country: &CountrySpec,
    indicator: &IndicatorSpec,
    start: NaiveDate,
    end: NaiveDate,
) -> SeriesResult {
    let (parsed, apply_yoy) = match raw {
        RawSeries::Fred(obs) => {
            let parsed: Vec<(NaiveDate, Option<f64>)> = obs
                .iter()
                .filter_map(|o| parse_fred_date(&o.date).map(|d| (d, parse_number(&o.value))))
                .collect();
            (parsed, indicator.fred_pct_change_yoy)
        }
        RawSeries::WorldBank(rows) => {
            let parsed: Vec<(NaiveDate, Option<f64>)> = rows
                .iter()
                .filter_map(|r| {
                    parse_wb_date(&r.date).map(|d| (d, r.value.filter(|v| v.is_finite())))
                })
                .collect();
            (parsed, false)
        }
    };

    // BTreeMap gives the sort; inserting in provider order makes the
    // duplicate-date policy (last write wins) deterministic.
    let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    for (date, value) in parsed {
        by_date.insert(date, value);
    }
    let mut rows: Vec<(NaiveDate, Option<f64>)> = by_date.into_iter().collect();

    if apply_yoy {
        yoy_percent_change(&mut rows);
    }

    let points = rows
        .into_iter()
        .filter(|(d, _)| *d >= start && *d <= end)
        .map(|(date, value)| ObservationPoint { date, value })
        .collect();

    SeriesResult {
        country_key: country.key.clone(),
        indicator_key: indicator.key.clone(),
        points,
        is_synthetic: false,
        fallback_reason: None,
    }
}

/// Replace levels with percent change versus the observation dated exactly
/// twelve months earlier. Looking up the base by date keeps the transform
/// cadence-independent: monthly series use the row 12 back, quarterly
/// series the row 4 back. Rows without a base (or with a missing or zero
/// base) become explicit missing values.
fn yoy_percent_change(rows: &mut Vec<(NaiveDate, Option<f64>)>) {
    let levels: BTreeMap<NaiveDate, f64> = rows
        .iter()
        .filter_map(|(d, v)| v.map(|v| (*d, v)))
        .collect();
    for (date, value) in rows.iter_mut() {
        let base = date
            .checked_sub_months(Months::new(12))
            .and_then(|d| levels.get(&d).copied());
        *value = match (*value, base) {
            (Some(cur), Some(base)) if base != 0.0 => Some((cur / base - 1.0) * 100.0),
            _ => None,
        };
    }
}

fn parse_fred_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// World Bank dates arrive as `"2020"` from the raw API, or `"YR2020"`
/// through the official client libraries. Annual values are pinned to
/// January 1st.
fn parse_wb_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("YR").unwrap_or(trimmed);
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    let year: i32 = trimmed.parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
