//! Command-line parsing for the macro indicator tracker.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the acquisition/assembly code.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "macrot",
    version,
    about = "Macro indicator dashboard (FRED + World Bank, synthetic fallback)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one country/indicator series: summary stats, table, ASCII chart.
    Show(ShowArgs),
    /// Compare one indicator across two countries (joined table + correlation).
    Compare(CompareArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same fetch/normalize/assemble pipeline as `macrot show`,
    /// but renders results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Options for `macrot show`.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Country key (US, DE, JP, ... — see the country registry).
    #[arg(short = 'c', long, default_value = "US")]
    pub country: String,

    /// Indicator key (CPI, UNEMP, GDP, POLICY).
    #[arg(short = 'i', long, default_value = "CPI")]
    pub indicator: String,

    /// Range start (YYYY-MM-DD). Defaults to ten years before the end.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Skip the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width in characters.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height in characters.
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for `macrot compare`.
#[derive(Debug, Parser, Clone)]
pub struct CompareArgs {
    /// Primary country key.
    #[arg(short = 'c', long, default_value = "US")]
    pub country: String,

    /// Country to compare against.
    #[arg(short = 'v', long, default_value = "DE")]
    pub versus: String,

    /// Indicator key (CPI, UNEMP, GDP, POLICY).
    #[arg(short = 'i', long, default_value = "CPI")]
    pub indicator: String,

    /// Range start (YYYY-MM-DD). Defaults to ten years before the end.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Skip the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width in characters.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height in characters.
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for `macrot tui` (initial dashboard selection).
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Primary country key.
    #[arg(short = 'c', long, default_value = "US")]
    pub country: String,

    /// Country to compare against.
    #[arg(short = 'v', long, default_value = "DE")]
    pub versus: String,

    /// Main indicator key.
    #[arg(short = 'i', long, default_value = "CPI")]
    pub indicator: String,

    /// Second indicator for the Charts tab.
    #[arg(long, default_value = "UNEMP")]
    pub second_indicator: String,

    /// Range start (YYYY-MM-DD). Defaults to ten years before the end.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,
}
