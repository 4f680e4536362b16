//! Terminal plotting for CLI output.

pub mod ascii;

pub use ascii::render_ascii_chart;
