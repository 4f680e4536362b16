//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves date-range defaults
//! - runs the fetch/normalize/assemble pipeline
//! - prints reports/plots or hands over to the TUI

use chrono::NaiveDate;
use clap::Parser;

use crate::cli::{Command, CompareArgs, ShowArgs};
use crate::data::ProviderAdapter;
use crate::domain::default_range;
use crate::error::AppError;
use crate::registry::Registries;

pub mod pipeline;

/// Rows of joined data printed under the summary in CLI mode.
const TABLE_TAIL_ROWS: usize = 24;

/// Entry point for the `macrot` binary.
pub fn run() -> Result<(), AppError> {
    // We want `macrot` and `macrot -c DE` to behave like `macrot tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the dashboard-first UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::Compare(args) => handle_compare(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let registries = Registries::new();
    let adapter = ProviderAdapter::new(&registries);
    let (start, end) = resolve_range(args.start, args.end);

    let table = pipeline::run_selection(
        &adapter,
        &[(args.country.clone(), args.indicator.clone())],
        start,
        end,
    )?;

    println!("{}", crate::report::format_view_summary(&table));
    println!("{}", crate::report::format_comparison_table(&table, TABLE_TAIL_ROWS));

    if !args.no_plot {
        println!("{}", crate::plot::render_ascii_chart(&table, args.width, args.height));
    }

    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let registries = Registries::new();
    let adapter = ProviderAdapter::new(&registries);
    let (start, end) = resolve_range(args.start, args.end);

    let table = pipeline::run_selection(
        &adapter,
        &[
            (args.country.clone(), args.indicator.clone()),
            (args.versus.clone(), args.indicator.clone()),
        ],
        start,
        end,
    )?;

    println!("{}", crate::report::format_view_summary(&table));
    let correlations = crate::report::format_correlations(&table);
    if !correlations.is_empty() {
        println!("{correlations}");
    }
    println!("{}", crate::report::format_comparison_table(&table, TABLE_TAIL_ROWS));

    if !args.no_plot {
        println!("{}", crate::plot::render_ascii_chart(&table, args.width, args.height));
    }

    Ok(())
}

/// Fill in the default window (trailing ten years) where flags are absent.
pub fn resolve_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let (default_start, default_end) = default_range();
    (start.unwrap_or(default_start), end.unwrap_or(default_end))
}

/// Rewrite argv so `macrot` defaults to `macrot tui`.
///
/// Rules:
/// - `macrot`                      -> `macrot tui`
/// - `macrot -c DE ...`            -> `macrot tui -c DE ...`
/// - `macrot --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "compare" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
