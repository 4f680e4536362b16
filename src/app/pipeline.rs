//! Shared "view pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! registry lookup -> fetch-or-fallback -> normalize -> outer join
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! Every interaction recomputes its tables from scratch; nothing is cached
//! across calls.

use chrono::NaiveDate;

use crate::compare::{ComparisonTable, assemble};
use crate::data::ProviderAdapter;
use crate::domain::ViewConfig;
use crate::error::AppError;

/// All assembled tables behind one dashboard refresh.
#[derive(Debug, Clone)]
pub struct ViewOutput {
    /// Charts tab: the primary country's two indicators.
    pub charts: ComparisonTable,
    /// Compare tab: the main indicator across primary and compare countries.
    pub compare: ComparisonTable,
}

/// Assemble one explicit selection (the CLI entry point).
pub fn run_selection(
    adapter: &ProviderAdapter<'_>,
    selected: &[(String, String)],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ComparisonTable, AppError> {
    assemble(adapter, selected, start, end)
}

/// Assemble everything one dashboard refresh needs.
pub fn run_view(adapter: &ProviderAdapter<'_>, config: &ViewConfig) -> Result<ViewOutput, AppError> {
    let charts = assemble(
        adapter,
        &[
            (config.primary.clone(), config.indicator.clone()),
            (config.primary.clone(), config.second_indicator.clone()),
        ],
        config.start,
        config.end,
    )?;

    let compare = assemble(
        adapter,
        &[
            (config.primary.clone(), config.indicator.clone()),
            (config.compare.clone(), config.indicator.clone()),
        ],
        config.start,
        config.end,
    )?;

    Ok(ViewOutput { charts, compare })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FredClient, WbClient};
    use crate::registry::{CountrySpec, Registries};

    fn offline_registries() -> Registries {
        let base = Registries::new();
        Registries::from_parts(
            base.indicators
                .keys()
                .iter()
                .map(|k| base.indicators.lookup(k).unwrap().clone())
                .collect(),
            vec![
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
            ],
        )
    }

    #[test]
    fn run_view_assembles_both_tables() {
        let regs = offline_registries();
        let adapter =
            ProviderAdapter::with_clients(&regs, FredClient::with_key(None), WbClient::new());
        let config = ViewConfig {
            primary: "TL".to_string(),
            compare: "ZZ".to_string(),
            indicator: "CPI".to_string(),
            second_indicator: "UNEMP".to_string(),
            start: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        };

        let view = run_view(&adapter, &config).unwrap();
        assert_eq!(view.charts.columns.len(), 2);
        assert_eq!(view.compare.columns.len(), 2);
        assert!(view.charts.columns.iter().all(|c| c.is_synthetic));
        // Same indicator, two countries on the compare tab.
        assert!(
            view.compare
                .columns
                .iter()
                .all(|c| c.indicator_key == "CPI")
        );
    }
}
