//! FRED API client (provider A, used for United States series).

use chrono::{Months, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::RawSeries;
use crate::data::provider::ProviderError;
use crate::registry::IndicatorSpec;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 10000;

/// A raw FRED observation. Values arrive as strings; `"."` marks missing.
#[derive(Debug, Clone, Deserialize)]
pub struct FredObservation {
    pub date: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<FredObservation>,
}

pub struct FredClient {
    client: Client,
    api_key: Option<String>,
}

impl FredClient {
    /// Read the credential from the environment (`.env` supported).
    ///
    /// A missing key is a normal, expected condition: fetches short-circuit
    /// to the synthetic fallback without attempting the network.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::with_key(api_key)
    }

    pub fn with_key(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the raw observation list for one indicator over a date range.
    /// Exactly one HTTP attempt; any failure maps to a `ProviderError`.
    pub fn fetch(
        &self,
        indicator: &IndicatorSpec,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, ProviderError> {
        let Some(api_key) = &self.api_key else {
            return Err(ProviderError::MissingCredential);
        };

        // YoY presentation needs twelve months of history before the window.
        let obs_start = if indicator.fred_pct_change_yoy {
            start.checked_sub_months(Months::new(12)).unwrap_or(start)
        } else {
            start
        };

        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", indicator.fred_series_id.as_str()),
                ("api_key", api_key),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("limit", &OBS_LIMIT.to_string()),
                ("observation_start", &obs_start.to_string()),
                ("observation_end", &end.to_string()),
            ])
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(RawSeries::Fred(body.observations))
    }
}
