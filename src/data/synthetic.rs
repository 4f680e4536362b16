//! Deterministic synthetic fallback series.
//!
//! When a provider is unreachable (or no credential is configured) the
//! adapter substitutes a generated series. Two properties are contractual:
//!
//! - **Determinism**: the seed is derived purely from the country and
//!   indicator keys, so repeated calls with the same inputs are
//!   bit-identical.
//! - **Indicator-appropriate shape and bounds**: each shape family stays
//!   inside a plausible band for its indicator (documented per constant
//!   below and in DESIGN.md).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::domain::{ObservationPoint, SeriesResult};
use crate::registry::{CountrySpec, IndicatorSpec, SyntheticShape};

/// CPI index: starts near 98, drifts up ~0.12/month with small noise,
/// clamped to a 95–115 index band.
const CPI_START: f64 = 98.0;
const CPI_DRIFT: f64 = 0.12;
const CPI_NOISE: f64 = 0.3;
const CPI_BAND: (f64, f64) = (95.0, 115.0);

/// Unemployment: mean-reverts toward 5% inside a 2–15% band.
const UNEMP_BASE: f64 = 5.0;
const UNEMP_REVERSION: f64 = 0.15;
const UNEMP_NOISE: f64 = 0.2;
const UNEMP_BAND: (f64, f64) = (2.0, 15.0);

/// GDP growth: ~2% trend with a mild 4-year cycle, in a -5..8% band.
const GDP_TREND: f64 = 2.0;
const GDP_AMPLITUDE: f64 = 1.5;
const GDP_CYCLE_MONTHS: f64 = 48.0;
const GDP_NOISE: f64 = 0.4;
const GDP_BAND: (f64, f64) = (-5.0, 8.0);

/// Policy rate: quarter-point steps, held between moves, 0–10%.
const POLICY_START: f64 = 4.0;
const POLICY_STEP: f64 = 0.25;
const POLICY_MOVE_PROB: f64 = 0.10;
const POLICY_BAND: (f64, f64) = (0.0, 10.0);

/// Generate a monthly synthetic series over `[start, end]` inclusive.
pub fn synthesize(
    country: &CountrySpec,
    indicator: &IndicatorSpec,
    start: NaiveDate,
    end: NaiveDate,
) -> SeriesResult {
    let mut rng = StdRng::seed_from_u64(seed_for(&country.key, &indicator.key));
    let dates = month_grid(start, end);

    let values = match indicator.shape {
        SyntheticShape::TrendingIndex => trending_index(&mut rng, dates.len()),
        SyntheticShape::MeanReverting => mean_reverting(&mut rng, dates.len()),
        SyntheticShape::Cyclical => cyclical(&mut rng, dates.len()),
        SyntheticShape::Stepped => stepped(&mut rng, dates.len()),
    };

    let points = dates
        .into_iter()
        .zip(values)
        .map(|(date, value)| ObservationPoint {
            date,
            value: Some(value),
        })
        .collect();

    SeriesResult {
        country_key: country.key.clone(),
        indicator_key: indicator.key.clone(),
        points,
        is_synthetic: true,
        fallback_reason: None,
    }
}

fn seed_for(country_key: &str, indicator_key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    country_key.hash(&mut hasher);
    indicator_key.hash(&mut hasher);
    hasher.finish()
}

/// Monthly dates from `start` through `end`, anchored on `start`'s day.
fn month_grid(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        let Some(next) = current.checked_add_months(Months::new(1)) else {
            break;
        };
        current = next;
    }
    dates
}

fn trending_index(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let mut level = CPI_START;
    (0..n)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            level = (level + CPI_DRIFT + CPI_NOISE * z).clamp(CPI_BAND.0, CPI_BAND.1);
            level
        })
        .collect()
}

fn mean_reverting(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let mut rate = UNEMP_BASE;
    (0..n)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            rate = (rate + UNEMP_REVERSION * (UNEMP_BASE - rate) + UNEMP_NOISE * z)
                .clamp(UNEMP_BAND.0, UNEMP_BAND.1);
            rate
        })
        .collect()
}

fn cyclical(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let z: f64 = rng.sample(StandardNormal);
            let cycle = (2.0 * std::f64::consts::PI * i as f64 / GDP_CYCLE_MONTHS).sin();
            (GDP_TREND + GDP_AMPLITUDE * cycle + GDP_NOISE * z).clamp(GDP_BAND.0, GDP_BAND.1)
        })
        .collect()
}

fn stepped(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let mut rate = POLICY_START;
    (0..n)
        .map(|_| {
            let roll: f64 = rng.r#gen();
            if roll < POLICY_MOVE_PROB {
                rate += POLICY_STEP;
            } else if roll > 1.0 - POLICY_MOVE_PROB {
                rate -= POLICY_STEP;
            }
            rate = rate.clamp(POLICY_BAND.0, POLICY_BAND.1);
            rate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registries;

    fn testland() -> CountrySpec {
        CountrySpec {
            key: "TL".to_string(),
            display_name: "Testland".to_string(),
            wb_code: None,
        }
    }

    fn indicator(key: &str) -> IndicatorSpec {
        Registries::new().indicators.lookup(key).unwrap().clone()
    }

    fn jan(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
    }

    #[test]
    fn generation_is_bit_identical() {
        let tl = testland();
        let cpi = indicator("CPI");
        let a = synthesize(&tl, &cpi, jan(2020), NaiveDate::from_ymd_opt(2020, 12, 1).unwrap());
        let b = synthesize(&tl, &cpi, jan(2020), NaiveDate::from_ymd_opt(2020, 12, 1).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn testland_cpi_year_is_twelve_points_in_band() {
        let series = synthesize(
            &testland(),
            &indicator("CPI"),
            jan(2020),
            NaiveDate::from_ymd_opt(2020, 12, 1).unwrap(),
        );
        assert_eq!(series.points.len(), 12);
        assert!(series.is_synthetic);
        assert!(series.is_strictly_sorted());
        for p in &series.points {
            let v = p.value.unwrap();
            assert!((95.0..=115.0).contains(&v), "CPI {v} outside index band");
        }
    }

    #[test]
    fn policy_rate_moves_in_quarter_points() {
        let series = synthesize(&testland(), &indicator("POLICY"), jan(2015), jan(2025));
        for p in &series.points {
            let v = p.value.unwrap();
            assert!((0.0..=10.0).contains(&v));
            let quarters = v / 0.25;
            assert!(
                (quarters - quarters.round()).abs() < 1e-9,
                "policy rate {v} not a quarter-point multiple"
            );
        }
    }

    #[test]
    fn unemployment_stays_in_band() {
        let series = synthesize(&testland(), &indicator("UNEMP"), jan(2005), jan(2025));
        for p in &series.points {
            let v = p.value.unwrap();
            assert!((2.0..=15.0).contains(&v), "unemployment {v} outside band");
        }
    }

    #[test]
    fn different_countries_get_different_paths() {
        let cpi = indicator("CPI");
        let de = CountrySpec {
            key: "DE".to_string(),
            display_name: "Germany".to_string(),
            wb_code: Some("DEU".to_string()),
        };
        let a = synthesize(&testland(), &cpi, jan(2020), jan(2022));
        let b = synthesize(&de, &cpi, jan(2020), jan(2022));
        assert_ne!(a.points, b.points);
    }
}
