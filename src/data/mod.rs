//! Data acquisition: provider clients, fallback generation, normalization.
//!
//! Layout mirrors the pipeline:
//!
//! - `fred` / `worldbank` — thin HTTP clients, each returning its provider's
//!   raw shape untouched
//! - `normalize` — one canonical `SeriesResult` out of either raw shape
//! - `synthetic` — deterministic fallback series
//! - `provider` — the adapter tying it all together (try real, else synthesize)

pub mod fred;
pub mod normalize;
pub mod provider;
pub mod synthetic;
pub mod worldbank;

pub use fred::{FredClient, FredObservation};
pub use provider::{ProviderAdapter, ProviderError};
pub use worldbank::{WbClient, WbRow};

/// What a provider handed back, before normalization.
///
/// The two providers return structurally different payloads (FRED: string
/// date/value pairs, World Bank: year-keyed nullable rows). Keeping the
/// variants tagged isolates provider quirks from the normalizer's core logic.
#[derive(Debug, Clone)]
pub enum RawSeries {
    Fred(Vec<FredObservation>),
    WorldBank(Vec<WbRow>),
}
