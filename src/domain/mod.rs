//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the normalized time-series shapes (`ObservationPoint`, `SeriesResult`)
//! - the per-interaction selection (`ViewConfig`)
//! - session-only annotation types (`TheoryTag`, `Note`)

pub mod types;

pub use types::*;
