//! Reporting utilities: formatted terminal output for the CLI front-end.
//!
//! We keep formatting code in one place so:
//! - the acquisition/assembly code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::{format_comparison_table, format_correlations, format_view_summary};
