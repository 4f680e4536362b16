//! `macro-tracker` library crate.
//!
//! The binary (`macrot`) is a thin wrapper around this library so that:
//!
//! - the fetch/normalize/assemble pipeline is testable without spawning processes
//! - modules are reusable (e.g., future daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod compare;
pub mod data;
pub mod domain;
pub mod error;
pub mod plot;
pub mod registry;
pub mod report;
pub mod tui;
