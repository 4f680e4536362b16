//! World Bank development-indicators client (provider B, non-US countries).
//!
//! The v2 API needs no credential. Responses are a two-element JSON array:
//! `[paging-metadata, rows]`, with rows keyed by country + indicator + year
//! and nullable values. We keep the rows raw and let the normalizer deal
//! with the date format and missing values.

use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::RawSeries;
use crate::data::provider::ProviderError;
use crate::registry::{CountrySpec, IndicatorSpec};

const BASE_URL: &str = "https://api.worldbank.org/v2";
// Annual series for a 20-year window fit easily in one page.
const PER_PAGE: usize = 500;

/// A raw World Bank row. Dates are year strings (sometimes `YR`-prefixed);
/// values are already numeric but nullable.
#[derive(Debug, Clone, Deserialize)]
pub struct WbRow {
    pub date: String,
    pub value: Option<f64>,
}

pub struct WbClient {
    client: Client,
}

impl WbClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Fetch the raw annual rows for one country/indicator over a year range.
    /// Exactly one HTTP attempt; any failure maps to a `ProviderError`.
    pub fn fetch(
        &self,
        country: &CountrySpec,
        indicator: &IndicatorSpec,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, ProviderError> {
        let Some(wb_code) = &country.wb_code else {
            return Err(ProviderError::Unconfigured);
        };

        let url = format!(
            "{BASE_URL}/country/{wb_code}/indicator/{}",
            indicator.wb_indicator_id
        );
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("per_page", &PER_PAGE.to_string()),
                ("date", &format!("{}:{}", start.year(), end.year())),
            ])
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        // Any shape mismatch in the [metadata, rows] envelope is a parse failure.
        let body: serde_json::Value = resp
            .json()
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let rows_value = body
            .get(1)
            .cloned()
            .ok_or_else(|| ProviderError::Parse("missing data element in response".to_string()))?;
        let rows: Vec<WbRow> = serde_json::from_value(rows_value)
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(RawSeries::WorldBank(rows))
    }
}

impl Default for WbClient {
    fn default() -> Self {
        Self::new()
    }
}
