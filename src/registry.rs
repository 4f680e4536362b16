//! Static indicator and country registries.
//!
//! Both registries are immutable configuration built once at process start
//! and passed by reference to everything that needs lookup. They translate
//! a human-chosen key (`"US"`, `"CPI"`) into provider-specific identifiers
//! and validate selections before any fetch happens.

use std::collections::BTreeMap;

use crate::error::AppError;

/// Shape family for the synthetic fallback generator. The generator matches
/// on this instead of on indicator keys so test registries can reuse shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticShape {
    /// Index level drifting upward with small noise (CPI).
    TrendingIndex,
    /// Rate mean-reverting inside a band (unemployment).
    MeanReverting,
    /// Growth rate with a mild multi-year cycle (GDP).
    Cyclical,
    /// Level moving in quarter-point steps, held between moves (policy rate).
    Stepped,
}

/// One indicator's registry entry, carrying the per-provider series ids.
#[derive(Debug, Clone)]
pub struct IndicatorSpec {
    pub key: String,
    pub label: String,
    pub unit: &'static str,
    /// FRED series id used for the United States.
    pub fred_series_id: String,
    /// Whether the FRED series is a raw level that should be presented as
    /// year-over-year percent change (CPIAUCSL, GDPC1).
    pub fred_pct_change_yoy: bool,
    /// World Development Indicators code used for every other country.
    pub wb_indicator_id: String,
    pub shape: SyntheticShape,
}

/// One country's registry entry.
#[derive(Debug, Clone)]
pub struct CountrySpec {
    pub key: String,
    pub display_name: String,
    /// ISO code for the World Bank API. `None` means no provider is
    /// configured for this country and every fetch falls back to synthetic.
    pub wb_code: Option<String>,
}

impl CountrySpec {
    /// The United States is served by FRED; everyone else by the World Bank.
    pub fn uses_fred(&self) -> bool {
        self.key == "US"
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorRegistry {
    map: BTreeMap<String, IndicatorSpec>,
}

impl IndicatorRegistry {
    pub fn from_specs(specs: Vec<IndicatorSpec>) -> Self {
        let map = specs.into_iter().map(|s| (s.key.clone(), s)).collect();
        Self { map }
    }

    pub fn lookup(&self, key: &str) -> Result<&IndicatorSpec, AppError> {
        self.map
            .get(key)
            .ok_or_else(|| AppError::unknown_key("indicator", key, &self.keys()))
    }

    /// Keys in deterministic (sorted) order.
    pub fn keys(&self) -> Vec<&str> {
        self.map.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CountryRegistry {
    map: BTreeMap<String, CountrySpec>,
}

impl CountryRegistry {
    pub fn from_specs(specs: Vec<CountrySpec>) -> Self {
        let map = specs.into_iter().map(|s| (s.key.clone(), s)).collect();
        Self { map }
    }

    pub fn lookup(&self, key: &str) -> Result<&CountrySpec, AppError> {
        self.map
            .get(key)
            .ok_or_else(|| AppError::unknown_key("country", key, &self.keys()))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.map.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Both registries, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct Registries {
    pub indicators: IndicatorRegistry,
    pub countries: CountryRegistry,
}

impl Registries {
    pub fn new() -> Self {
        Self {
            indicators: IndicatorRegistry::from_specs(default_indicators()),
            countries: CountryRegistry::from_specs(default_countries()),
        }
    }

    pub fn from_parts(indicators: Vec<IndicatorSpec>, countries: Vec<CountrySpec>) -> Self {
        Self {
            indicators: IndicatorRegistry::from_specs(indicators),
            countries: CountryRegistry::from_specs(countries),
        }
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

fn default_indicators() -> Vec<IndicatorSpec> {
    vec![
        IndicatorSpec {
            key: "CPI".to_string(),
            label: "Inflation (CPI, % YoY)".to_string(),
            unit: "%",
            fred_series_id: "CPIAUCSL".to_string(),
            fred_pct_change_yoy: true,
            wb_indicator_id: "FP.CPI.TOTL.ZG".to_string(),
            shape: SyntheticShape::TrendingIndex,
        },
        IndicatorSpec {
            key: "UNEMP".to_string(),
            label: "Unemployment (%)".to_string(),
            unit: "%",
            fred_series_id: "UNRATE".to_string(),
            fred_pct_change_yoy: false,
            wb_indicator_id: "SL.UEM.TOTL.ZS".to_string(),
            shape: SyntheticShape::MeanReverting,
        },
        IndicatorSpec {
            key: "GDP".to_string(),
            label: "GDP Growth (Real, % YoY)".to_string(),
            unit: "%",
            fred_series_id: "GDPC1".to_string(),
            fred_pct_change_yoy: true,
            wb_indicator_id: "NY.GDP.MKTP.KD.ZG".to_string(),
            shape: SyntheticShape::Cyclical,
        },
        IndicatorSpec {
            key: "POLICY".to_string(),
            label: "Policy/Reference Rate (%)".to_string(),
            unit: "%",
            fred_series_id: "DFF".to_string(),
            fred_pct_change_yoy: false,
            wb_indicator_id: "FR.INR.RINR".to_string(),
            shape: SyntheticShape::Stepped,
        },
    ]
}

fn default_countries() -> Vec<CountrySpec> {
    // G20 members plus the EU aggregate.
    [
        ("US", "United States", "USA"),
        ("CA", "Canada", "CAN"),
        ("MX", "Mexico", "MEX"),
        ("BR", "Brazil", "BRA"),
        ("AR", "Argentina", "ARG"),
        ("GB", "United Kingdom", "GBR"),
        ("DE", "Germany", "DEU"),
        ("FR", "France", "FRA"),
        ("IT", "Italy", "ITA"),
        ("EU", "European Union", "EUU"),
        ("RU", "Russia", "RUS"),
        ("CN", "China", "CHN"),
        ("IN", "India", "IND"),
        ("JP", "Japan", "JPN"),
        ("KR", "South Korea", "KOR"),
        ("ID", "Indonesia", "IDN"),
        ("AU", "Australia", "AUS"),
        ("SA", "Saudi Arabia", "SAU"),
        ("ZA", "South Africa", "ZAF"),
        ("TR", "Türkiye", "TUR"),
    ]
    .into_iter()
    .map(|(key, name, wb)| CountrySpec {
        key: key.to_string(),
        display_name: name.to_string(),
        wb_code: Some(wb.to_string()),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registries_cover_g20_and_four_indicators() {
        let regs = Registries::new();
        assert_eq!(regs.countries.len(), 20);
        assert_eq!(regs.indicators.len(), 4);
        assert!(regs.countries.lookup("US").unwrap().uses_fred());
        assert!(!regs.countries.lookup("DE").unwrap().uses_fred());
        assert_eq!(
            regs.indicators.lookup("CPI").unwrap().wb_indicator_id,
            "FP.CPI.TOTL.ZG"
        );
    }

    #[test]
    fn unknown_keys_fail_lookup() {
        let regs = Registries::new();
        let err = regs.countries.lookup("XX").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
        assert!(err.to_string().contains("XX"));
        assert!(regs.indicators.lookup("M2").is_err());
    }

    #[test]
    fn keys_are_sorted_and_stable() {
        let regs = Registries::new();
        let keys = regs.indicators.keys();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }
}
